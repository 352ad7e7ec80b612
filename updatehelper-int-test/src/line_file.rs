use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use updatehelper::errors::{ErrorKind, UpdateError, UpdateResult};
use updatehelper::testing::{StorageProvider, UpdateTest, UpdateTestExecutor};
use updatehelper::{FnUpdate, Update, UpdateCollection, UpdateWorker, Version};

/// Line holding the stored version of a [`LineFile`].
pub const VERSION_LINE: usize = 1;

/// A plain text file used as versioned storage.
///
/// The first line holds the version, everything below is data. Lines are numbered
/// from 1.
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
    closed: bool,
}

impl LineFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LineFile {
            path: path.into(),
            closed: false,
        }
    }

    /// Creates the file with `version` as its only line, replacing any existing file.
    pub fn create(path: impl Into<PathBuf>, version: Version) -> UpdateResult<Self> {
        let file = LineFile::new(path);
        fs::write(&file.path, format!("{}\n", version))?;
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn lines(&self) -> UpdateResult<Vec<String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn write_lines(&self, lines: &[String]) -> UpdateResult<()> {
        let mut content = lines.join("\n");
        if !lines.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn read_line(&self, line_number: usize) -> UpdateResult<String> {
        check_line_number(line_number)?;
        let lines = self.lines()?;
        lines.get(line_number - 1).cloned().ok_or_else(|| {
            UpdateError::new(
                &format!(
                    "Line {} is beyond the end of {} ({} lines)",
                    line_number,
                    self.path.display(),
                    lines.len()
                ),
                ErrorKind::InvalidOperation,
            )
        })
    }

    pub fn append_line(&self, line: &str) -> UpdateResult<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Replaces an existing line.
    pub fn change_line(&self, line_number: usize, line: &str) -> UpdateResult<()> {
        check_line_number(line_number)?;
        let mut lines = self.lines()?;
        if lines.len() < line_number {
            log::error!("Cannot change line {} of {} lines", line_number, lines.len());
            return Err(UpdateError::new(
                &format!(
                    "Line number {} is bigger than the line count {}",
                    line_number,
                    lines.len()
                ),
                ErrorKind::InvalidOperation,
            ));
        }
        lines[line_number - 1] = line.to_string();
        self.write_lines(&lines)
    }

    /// Writes a line, padding the file with empty lines if it is too short.
    pub fn write_line(&self, line_number: usize, line: &str) -> UpdateResult<()> {
        check_line_number(line_number)?;
        self.add_empty_lines(line_number)?;
        self.change_line(line_number, line)
    }

    /// Pads the file with empty lines until it has at least `line_count` lines.
    pub fn add_empty_lines(&self, line_count: usize) -> UpdateResult<()> {
        let mut lines = self.lines()?;
        if lines.len() < line_count {
            lines.resize(line_count, String::new());
            self.write_lines(&lines)?;
        }
        Ok(())
    }

    pub fn version(&self) -> UpdateResult<Version> {
        let line = self.read_line(VERSION_LINE)?;
        line.trim().parse::<Version>().map_err(|err| {
            log::error!("Invalid version line '{}' in {}", line, self.path.display());
            UpdateError::new_with_cause(
                &format!("Invalid version line '{}'", line),
                ErrorKind::IOError,
                err,
            )
        })
    }

    pub fn set_version(&self, version: Version) -> UpdateResult<()> {
        self.change_line(VERSION_LINE, &version.to_string())
    }
}

fn check_line_number(line_number: usize) -> UpdateResult<()> {
    if line_number == 0 {
        return Err(UpdateError::new(
            "Line numbers start at 1",
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}

pub type SharedLineUpdate = Arc<dyn Update<Storage = LineFile>>;

/// Update that appends `"<version> - HELLO"` and stores its version.
pub fn hello_update(version: Version) -> SharedLineUpdate {
    Arc::new(FnUpdate::new(version, move |file: &mut LineFile| {
        file.append_line(&format!("{} - HELLO", version))?;
        file.set_version(version)?;
        Ok(())
    }))
}

pub fn hello_updates(count: Version) -> Vec<SharedLineUpdate> {
    (1..=count).map(hello_update).collect()
}

/// Self-testing update that owns the data line right below the version line
/// plus its version.
#[derive(Debug, Clone, Copy)]
pub struct HelloLineTest {
    version: Version,
}

impl HelloLineTest {
    pub fn new(version: Version) -> Self {
        HelloLineTest { version }
    }

    /// Data line owned by this update; negative versions have none.
    pub fn line_number(&self) -> UpdateResult<usize> {
        let offset = usize::try_from(self.version).map_err(|err| {
            log::error!("Version {} has no data line", self.version);
            UpdateError::new_with_cause(
                &format!("Version '{}' has no data line", self.version),
                ErrorKind::InvalidOperation,
                err,
            )
        })?;
        Ok(VERSION_LINE + offset)
    }
}

impl Update for HelloLineTest {
    type Storage = LineFile;

    fn update_version(&self) -> Version {
        self.version
    }

    fn execute(&self, file: &mut LineFile) -> anyhow::Result<()> {
        file.write_line(self.line_number()?, &format!("{} - HELLO", self.version))?;
        file.set_version(self.version)?;
        Ok(())
    }
}

impl UpdateTest for HelloLineTest {
    fn create_test_executor(
        &self,
        _: &LineFile,
    ) -> Option<Box<dyn UpdateTestExecutor<LineFile> + '_>> {
        Some(Box::new(MockLineCheck {
            line: *self,
            mock_data: None,
        }))
    }
}

struct MockLineCheck {
    line: HelloLineTest,
    mock_data: Option<String>,
}

impl UpdateTestExecutor<LineFile> for MockLineCheck {
    fn insert_mock_data(&mut self, file: &mut LineFile) -> anyhow::Result<()> {
        let line_number = self.line.line_number()?;
        let mock_data = format!("{} MOCKED!", file.read_line(line_number)?);
        file.change_line(line_number, &mock_data)?;
        self.mock_data = Some(mock_data);
        Ok(())
    }

    fn test_consistency(&mut self, file: &mut LineFile) -> anyhow::Result<()> {
        let line_number = self.line.line_number()?;
        let line = file.read_line(line_number)?;
        anyhow::ensure!(
            self.mock_data.as_deref() == Some(line.as_str()),
            "line {} is '{}', expected {:?}",
            line_number,
            line,
            self.mock_data
        );
        Ok(())
    }
}

pub fn hello_line_tests(count: Version) -> Vec<Arc<HelloLineTest>> {
    (1..=count).map(|version| Arc::new(HelloLineTest::new(version))).collect()
}

/// Worker upgrading a [`LineFile`] with a fixed list of updates.
///
/// Missing updates can be inserted to simulate a broken update list. On completion
/// the resulting lines are logged and kept.
pub struct LineFileWorker<U> {
    updates: Vec<Option<U>>,
    latest_update_version: Option<Version>,
    final_lines: Option<Vec<String>>,
}

impl<U> LineFileWorker<U>
where
    U: Update<Storage = LineFile> + Clone,
{
    pub fn new(updates: Vec<U>) -> Self {
        LineFileWorker {
            updates: updates.into_iter().map(Some).collect(),
            latest_update_version: None,
            final_lines: None,
        }
    }

    /// Inserts a hole at `position`.
    pub fn insert_missing(&mut self, position: usize) {
        self.updates.insert(position, None);
    }

    /// Overrides the version derived from the updates.
    pub fn set_latest_update_version(&mut self, version: Version) {
        self.latest_update_version = Some(version);
    }

    /// Lines of the file after the last successful upgrade.
    pub fn final_lines(&self) -> Option<&[String]> {
        self.final_lines.as_deref()
    }
}

impl<U> UpdateWorker for LineFileWorker<U>
where
    U: Update<Storage = LineFile> + Clone,
{
    type Storage = LineFile;
    type Update = U;

    fn latest_update_version(&self, _: &LineFile) -> Version {
        self.latest_update_version.unwrap_or_else(|| {
            self.updates
                .iter()
                .flatten()
                .map(|update| update.update_version())
                .max()
                .unwrap_or(0)
        })
    }

    fn create_updates(&mut self) -> UpdateCollection<U> {
        UpdateCollection::from_slots(self.updates.clone())
    }

    fn on_upgrading_done(&mut self, file: &mut LineFile) -> UpdateResult<()> {
        let lines = file.lines()?;
        log::info!("Done. - {}", file.path().display());
        for line in &lines {
            log::debug!("{}", line);
        }
        self.final_lines = Some(lines);
        Ok(())
    }

    fn is_storage_closed(&self, file: &LineFile) -> bool {
        file.is_closed()
    }
}

/// Storage provider for running update tests against a [`LineFile`].
#[derive(Debug, Default)]
pub struct LineFileProvider;

impl StorageProvider<LineFile> for LineFileProvider {
    fn set_version_by(&mut self, version: Version, file: &mut LineFile) -> UpdateResult<()> {
        file.set_version(version)
    }

    fn is_storage_closed(&self, file: &LineFile) -> bool {
        file.is_closed()
    }

    fn close_storage(&mut self, file: &mut LineFile) -> UpdateResult<()> {
        file.close();
        Ok(())
    }
}

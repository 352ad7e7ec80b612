use crate::line_file::LineFile;
use std::backtrace::Backtrace;
use std::path::PathBuf;
use std::{env, fs};
use updatehelper::errors::UpdateResult;
use updatehelper::Version;

/// Version a fresh test file starts at.
pub const START_VERSION: Version = 1;

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even if the test failed. Any failure panics with the error and
/// a backtrace.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: FnOnce(&mut TestContext) -> UpdateResult<()>,
    B: FnOnce() -> UpdateResult<TestContext>,
    A: FnOnce(TestContext) -> UpdateResult<()>,
{
    let backtrace = Backtrace::capture();
    let mut ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}\n{}", e, backtrace),
    };

    let test_result = test(&mut ctx);
    let after_result = after(ctx);

    if let Err(e) = test_result {
        panic!("Test failed: {:?}\n{}", e, backtrace);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}\n{}", e, backtrace);
    }
}

pub struct TestContext {
    path: PathBuf,
    file: LineFile,
}

impl TestContext {
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn file(&self) -> &LineFile {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut LineFile {
        &mut self.file
    }
}

pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(format!("{}.csv", id))
}

/// Creates a line file at a random temp path holding [`START_VERSION`].
pub fn create_test_context() -> UpdateResult<TestContext> {
    let path = random_path();
    let file = LineFile::create(&path, START_VERSION)?;
    Ok(TestContext { path, file })
}

pub fn cleanup(ctx: TestContext) -> UpdateResult<()> {
    if ctx.path.exists() {
        fs::remove_file(&ctx.path)?;
    }
    Ok(())
}

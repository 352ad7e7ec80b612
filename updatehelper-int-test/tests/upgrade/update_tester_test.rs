use std::sync::Arc;
use updatehelper::errors::ErrorKind;
use updatehelper::testing::{SharedUpdateTest, UpdateTest, UpdateTestExecutor, UpdateTester};
use updatehelper::{Update, Version};
use updatehelper_int_test::line_file::{hello_line_tests, HelloLineTest, LineFile, LineFileWorker};
use updatehelper_int_test::test_util::{cleanup, create_test_context, run_test, START_VERSION};

const TARGET_VERSION: Version = 10;

struct Untestable {
    version: Version,
}

impl Update for Untestable {
    type Storage = LineFile;

    fn update_version(&self) -> Version {
        self.version
    }

    fn execute(&self, file: &mut LineFile) -> anyhow::Result<()> {
        file.set_version(self.version)?;
        Ok(())
    }
}

impl UpdateTest for Untestable {
    fn create_test_executor(
        &self,
        _: &LineFile,
    ) -> Option<Box<dyn UpdateTestExecutor<LineFile> + '_>> {
        None
    }
}

#[test]
fn test_every_update_is_tested() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tester = UpdateTester::new(LineFileWorker::new(hello_line_tests(TARGET_VERSION)));

            let summary = tester.on_upgrade(ctx.file_mut(), START_VERSION, TARGET_VERSION)?;

            assert_eq!(summary.applied_versions, (2..=TARGET_VERSION).collect::<Vec<_>>());
            assert_eq!(tester.tested_versions(), summary.applied_versions.as_slice());

            let lines = ctx.file().lines()?;
            assert_eq!(lines.len(), TARGET_VERSION as usize + 1);
            assert_eq!(lines[0], TARGET_VERSION.to_string());
            // version 1 was skipped, its line stays empty
            assert_eq!(lines[1], "");
            assert_eq!(lines[2], "2 - HELLO MOCKED!");
            assert_eq!(lines[10], "10 - HELLO MOCKED!");
            assert!(tester.worker().final_lines().is_some());
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_update_without_test_fails() {
    run_test(
        create_test_context,
        |ctx| {
            let updates: Vec<SharedUpdateTest<LineFile>> = vec![
                Arc::new(HelloLineTest::new(1)),
                Arc::new(HelloLineTest::new(2)),
                Arc::new(Untestable { version: 3 }),
                Arc::new(HelloLineTest::new(4)),
            ];
            let mut tester = UpdateTester::new(LineFileWorker::new(updates));

            let err = tester.on_upgrade(ctx.file_mut(), 0, 4).unwrap_err();

            assert_eq!(err.kind(), &ErrorKind::TestExecutionFailed);
            assert_eq!(err.message(), "Test is null for update with version '3'");
            assert_eq!(tester.tested_versions(), &[1, 2]);
            // update 3 itself ran before its test was looked up
            assert_eq!(ctx.file().version()?, 3);
            assert!(tester.into_worker().final_lines().is_none());
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_negative_version_has_no_data_line() {
    run_test(
        create_test_context,
        |ctx| {
            assert_eq!(HelloLineTest::new(0).line_number()?, 1);
            assert_eq!(
                HelloLineTest::new(-1).line_number().unwrap_err().kind(),
                &ErrorKind::InvalidOperation
            );

            let updates = vec![Arc::new(HelloLineTest::new(-1)), Arc::new(HelloLineTest::new(1))];
            let mut tester = UpdateTester::new(LineFileWorker::new(updates));

            let err = tester.on_upgrade(ctx.file_mut(), -2, 1).unwrap_err();

            assert_eq!(err.failed_update_version(), Some(-1));
            assert_eq!(
                err.cause().map(|cause| cause.to_string()),
                Some("Version '-1' has no data line".to_string())
            );
            assert!(tester.tested_versions().is_empty());
            // nothing was written, not even a far away line
            assert_eq!(ctx.file().lines()?, vec!["1".to_string()]);
            Ok(())
        },
        cleanup,
    );
}

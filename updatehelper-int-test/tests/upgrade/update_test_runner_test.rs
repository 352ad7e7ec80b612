use updatehelper::errors::ErrorKind;
use updatehelper::testing::{SharedUpdateTest, UpdateTestRunner};
use updatehelper::Version;
use updatehelper_int_test::line_file::{hello_line_tests, LineFile, LineFileProvider};
use updatehelper_int_test::test_util::{cleanup, create_test_context, run_test, START_VERSION};

const TARGET_VERSION: Version = 25;

fn update_tests(count: Version) -> Vec<SharedUpdateTest<LineFile>> {
    hello_line_tests(count)
        .into_iter()
        .map(|test| test as SharedUpdateTest<LineFile>)
        .collect()
}

#[test]
fn test_runner_upgrades_and_closes_file() {
    run_test(
        create_test_context,
        |ctx| {
            let mut runner = UpdateTestRunner::new(LineFileProvider, update_tests(TARGET_VERSION));
            assert!(!ctx.file().is_closed());

            let summary = runner.run_test_updates(ctx.file_mut(), START_VERSION, TARGET_VERSION)?;

            assert_eq!(summary.applied_versions.len(), (TARGET_VERSION - START_VERSION) as usize);
            assert!(ctx.file().is_closed());
            assert_eq!(ctx.file().version()?, TARGET_VERSION);
            assert_eq!(
                ctx.file().read_line(TARGET_VERSION as usize + 1)?,
                format!("{} - HELLO MOCKED!", TARGET_VERSION)
            );
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_runner_refuses_closed_file() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.file_mut().close();
            let mut runner = UpdateTestRunner::new(LineFileProvider, update_tests(3));

            let err = runner
                .run_test_updates(ctx.file_mut(), START_VERSION, 3)
                .unwrap_err();

            assert_eq!(
                err.kind(),
                &ErrorKind::ExecutionError {
                    last_applied_version: None
                }
            );
            assert_eq!(ctx.file().lines()?, vec!["1".to_string()]);
            Ok(())
        },
        cleanup,
    );
}

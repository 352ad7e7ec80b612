use std::sync::Arc;
use updatehelper::errors::ErrorKind;
use updatehelper::{FnUpdate, UpdateHelper, ValidationResult, Version};
use updatehelper_int_test::line_file::{
    hello_update, hello_updates, LineFile, LineFileWorker, SharedLineUpdate,
};
use updatehelper_int_test::test_util::{cleanup, create_test_context, run_test, START_VERSION};

const TARGET_VERSION: Version = 10;

fn line_update(version: Version, line: &'static str, close: bool) -> SharedLineUpdate {
    Arc::new(FnUpdate::new(version, move |file: &mut LineFile| {
        file.append_line(line)?;
        if close {
            file.close();
        }
        Ok(())
    }))
}

fn failing_update(version: Version) -> SharedLineUpdate {
    Arc::new(FnUpdate::new(version, |_: &mut LineFile| {
        Err(anyhow::anyhow!("Test me!"))
    }))
}

#[test]
fn test_upgrade_file() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(hello_updates(TARGET_VERSION));
            let old_version = ctx.file().version()?;
            assert_eq!(old_version, START_VERSION);

            let summary =
                UpdateHelper::new(&mut worker).on_upgrade(ctx.file_mut(), old_version, TARGET_VERSION)?;

            assert_eq!(summary.applied_versions, (2..=TARGET_VERSION).collect::<Vec<_>>());
            assert_eq!(summary.skipped, 1);
            assert_eq!(ctx.file().version()?, TARGET_VERSION);

            let mut expected = vec![TARGET_VERSION.to_string()];
            expected.extend((2..=TARGET_VERSION).map(|v| format!("{} - HELLO", v)));
            assert_eq!(ctx.file().lines()?, expected);
            assert_eq!(worker.final_lines(), Some(expected.as_slice()));
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_upgrade_in_two_runs() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(hello_updates(5));
            UpdateHelper::new(&mut worker).on_upgrade(ctx.file_mut(), START_VERSION, 5)?;
            assert_eq!(ctx.file().version()?, 5);

            let mut worker = LineFileWorker::new(hello_updates(7));
            let summary = UpdateHelper::new(&mut worker).on_upgrade(ctx.file_mut(), 5, 7)?;
            assert_eq!(summary.applied_versions, vec![6, 7]);
            assert_eq!(summary.skipped, 5);
            assert_eq!(ctx.file().lines()?.len(), 7);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_missing_update_fails_before_any_change() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(hello_updates(TARGET_VERSION));
            worker.insert_missing(3);

            let err = UpdateHelper::new(&mut worker)
                .on_upgrade(ctx.file_mut(), START_VERSION, TARGET_VERSION)
                .unwrap_err();

            assert_eq!(err.kind(), &ErrorKind::NullInput);
            assert_eq!(ctx.file().lines()?, vec!["1".to_string()]);
            assert!(worker.final_lines().is_none());
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_latest_version_mismatch() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(hello_updates(TARGET_VERSION));
            worker.set_latest_update_version(1);

            let err = UpdateHelper::new(&mut worker)
                .on_upgrade(ctx.file_mut(), START_VERSION, TARGET_VERSION)
                .unwrap_err();

            assert_eq!(err.kind(), &ErrorKind::ConfigurationError);
            assert_eq!(ctx.file().version()?, START_VERSION);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_too_few_updates_for_target() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(hello_updates(3));
            worker.set_latest_update_version(TARGET_VERSION);

            let err = UpdateHelper::new(&mut worker)
                .on_upgrade(ctx.file_mut(), START_VERSION, TARGET_VERSION)
                .unwrap_err();

            assert_eq!(
                err.validation_result(),
                Some(ValidationResult::WrongFinalVersion {
                    expected: TARGET_VERSION,
                    actual: 3
                })
            );
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_storage_closed_during_upgrade() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(vec![
                line_update(1, "First", false),
                line_update(2, "FAIL!", true),
                line_update(3, "Third", false),
            ]);

            let err = UpdateHelper::new(&mut worker)
                .on_upgrade(ctx.file_mut(), START_VERSION, 3)
                .unwrap_err();

            assert_eq!(
                err.kind(),
                &ErrorKind::ExecutionError {
                    last_applied_version: Some(2)
                }
            );
            // update 1 was skipped, update 3 never ran
            assert_eq!(ctx.file().lines()?, vec!["1".to_string(), "FAIL!".to_string()]);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_failing_update() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(vec![hello_update(1), failing_update(2)]);

            let err = UpdateHelper::new(&mut worker)
                .on_upgrade(ctx.file_mut(), 0, 2)
                .unwrap_err();

            assert_eq!(err.failed_update_version(), Some(2));
            assert_eq!(err.message(), "Update with version '2' failed!");
            assert_eq!(
                err.cause().map(|cause| cause.to_string()),
                Some("Test me!".to_string())
            );
            // update 1 is not rolled back
            assert_eq!(ctx.file().version()?, 1);
            assert_eq!(ctx.file().read_line(2)?, "1 - HELLO");
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_same_start_and_target_version() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(hello_updates(TARGET_VERSION));

            let summary = UpdateHelper::new(&mut worker).on_upgrade(
                ctx.file_mut(),
                TARGET_VERSION,
                TARGET_VERSION,
            )?;

            assert!(summary.is_noop());
            assert!(worker.final_lines().is_none());
            assert_eq!(ctx.file().lines()?, vec!["1".to_string()]);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_plan_upgrade_leaves_file_untouched() {
    run_test(
        create_test_context,
        |ctx| {
            let mut worker = LineFileWorker::new(hello_updates(TARGET_VERSION));

            let planned = UpdateHelper::new(&mut worker).plan_upgrade(
                ctx.file(),
                START_VERSION,
                TARGET_VERSION,
            )?;

            assert_eq!(planned, (2..=TARGET_VERSION).collect::<Vec<_>>());
            assert_eq!(ctx.file().lines()?, vec!["1".to_string()]);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_line_helpers() {
    run_test(
        create_test_context,
        |ctx| {
            let file = ctx.file();
            file.add_empty_lines(100)?;
            assert_eq!(file.lines()?.len(), 100);

            file.write_line(120, "far away")?;
            assert_eq!(file.lines()?.len(), 120);
            assert_eq!(file.read_line(120)?, "far away");

            assert!(file.read_line(0).is_err());
            assert!(file.change_line(121, "nope").is_err());
            Ok(())
        },
        cleanup,
    );
}

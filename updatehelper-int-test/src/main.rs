use updatehelper::errors::UpdateResult;
use updatehelper::testing::UpdateTester;
use updatehelper::UpdateHelper;
use updatehelper_int_test::line_file::{hello_line_tests, hello_updates, LineFileWorker};
use updatehelper_int_test::test_util::{cleanup, create_test_context};

fn main() -> UpdateResult<()> {
    colog::init();
    println!("Starting upgrade stress test...");

    let count = 2000;
    let mut ctx = create_test_context()?;
    let mut worker = LineFileWorker::new(hello_updates(count));

    let start = std::time::Instant::now();
    let old_version = ctx.file().version()?;
    let summary = UpdateHelper::builder(&mut worker)
        .label("stress-file")
        .step_log_level(log::Level::Trace)
        .build()?
        .on_upgrade(ctx.file_mut(), old_version, count)?;
    println!(
        "Applied {} updates ({} skipped) in {:?}",
        summary.applied_versions.len(),
        summary.skipped,
        start.elapsed()
    );
    cleanup(ctx)?;

    let count = 200;
    let mut ctx = create_test_context()?;
    let mut tester = UpdateTester::new(LineFileWorker::new(hello_line_tests(count)));

    let start = std::time::Instant::now();
    let old_version = ctx.file().version()?;
    tester.on_upgrade(ctx.file_mut(), old_version, count)?;
    println!(
        "Applied and tested {} updates in {:?}",
        tester.tested_versions().len(),
        start.elapsed()
    );

    cleanup(ctx)
}

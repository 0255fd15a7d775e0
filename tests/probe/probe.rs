use std::path::PathBuf;

use rand::{
    distributions::Alphanumeric,
    Rng,
};
use rawprobe::{
    kernel::structs::Stat,
    raw::Errno,
    Logger,
    Probe,
    ProbeError,
    Step,
};

fn scratch_path() -> PathBuf {
    let name: String = rand::thread_rng().sample_iter(&Alphanumeric).take(12).map(char::from).collect();
    std::env::temp_dir().join(format!("rawprobe-it-{}.txt", name))
}

#[test]
fn fresh_file_holds_payload() {
    let path = scratch_path();
    let probe = Probe::builder().path(&path).build().unwrap();
    let mut out = Vec::new();
    let report = probe.run(&mut out, &mut Logger::spinner()).unwrap();

    assert!(report.is_ok());
    assert_eq!(report.write.r1, 11);
    assert_eq!(report.stat.st_size, 11);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 11);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello world");

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.lines().count(), 4);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn second_run_is_stable() {
    let path = scratch_path();
    let probe = Probe::builder().path(&path).leak_handle(false).build().unwrap();

    for _ in 0..2 {
        let report = probe.run(&mut std::io::sink(), &mut Logger::spinner()).unwrap();
        assert_eq!(report.stat.st_size, 11);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello world");
    }

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn metadata_matches_std() {
    use std::os::unix::fs::MetadataExt;

    let path = scratch_path();
    let probe = Probe::builder().path(&path).leak_handle(false).build().unwrap();
    let report = probe.run(&mut std::io::sink(), &mut Logger::spinner()).unwrap();
    let meta = std::fs::metadata(&path).unwrap();

    assert_eq!(report.stat.st_ino, meta.ino());
    assert_eq!(report.stat.st_dev, meta.dev());
    assert_eq!(report.stat.st_mode, meta.mode());
    assert_eq!(report.stat.st_uid, meta.uid());
    assert_eq!(report.stat.st_gid, meta.gid());
    assert_eq!(report.stat.st_size as u64, meta.size());
    assert_eq!(report.stat.st_mtime.tv_sec, meta.mtime());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_directory_still_reports() {
    let probe = Probe::builder().path("/nonexistent-rawprobe-dir/sub/test.txt").build().unwrap();
    let mut out = Vec::new();
    let report = probe.run(&mut out, &mut Logger::spinner()).unwrap();

    assert!(report.open.errno.is_err());
    assert_eq!(report.stat, Stat::default());

    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with(&format!("fd: {} r2: 0 errNo: ", usize::MAX)));
    assert_eq!(lines[3], format!("{:?}", Stat::default()));
}

#[test]
fn abort_on_error_stops_at_open() {
    let probe = Probe::builder().path("/nonexistent-rawprobe-dir/sub/test.txt").continue_on_error(false).build().unwrap();

    match probe.run(&mut std::io::sink(), &mut Logger::spinner()) {
        Err(ProbeError::StepFailed {
            step,
            errno,
        }) => {
            assert_eq!(step, Step::Open);
            assert_eq!(errno, Errno(libc::ENOENT));
        },
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn read_only_directory_reports_eacces() {
    use std::os::unix::fs::PermissionsExt;

    // root ignores directory permissions
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let dir = scratch_path();
    std::fs::create_dir(&dir).unwrap();
    std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o555)).unwrap();

    let probe = Probe::builder().path(dir.join("test.txt")).build().unwrap();
    let mut out = Vec::new();
    let report = probe.run(&mut out, &mut Logger::spinner()).unwrap();

    assert_eq!(report.open.errno, Errno(libc::EACCES));
    assert_eq!(report.write.errno, Errno(libc::EBADF));
    assert_eq!(report.fstat.errno, Errno(libc::EBADF));
    assert_eq!(report.stat, Stat::default());

    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("errNo: permission denied"));
    assert!(!dir.join("test.txt").exists());

    std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::fs::remove_dir(&dir).unwrap();
}

#[test]
fn unwritable_output_keeps_going() {
    struct Full;

    impl std::io::Write for Full {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from_raw_os_error(libc::ENOSPC))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let path = scratch_path();
    let probe = Probe::builder().path(&path).build().unwrap();
    let report = probe.run(&mut Full, &mut Logger::spinner()).unwrap();

    assert_eq!(report.lost_lines, 4);
    assert_eq!(report.stat.st_size, 11);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello world");

    std::fs::remove_file(&path).unwrap();
}

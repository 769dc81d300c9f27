use std::fs::File;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

/// Blocks until an advisory `flock` is held on `file`.
///
/// The lock belongs to the open file description and is released when the
/// handle is closed.
#[cfg(unix)]
pub fn lock_file(file: &File, mode: LockMode) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;

    let operation = match mode {
        LockMode::Shared => libc::LOCK_SH,
        LockMode::Exclusive => libc::LOCK_EX,
    };
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, operation) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn lock_file(_file: &File, _mode: LockMode) -> Result<(), std::io::Error> {
    Ok(())
}

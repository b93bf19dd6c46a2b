use crate::error::ResourceError;

/// Caps the data segment of the current process at `bytes`.
#[cfg(unix)]
pub fn limit_system_memory(bytes: u64) -> Result<(), ResourceError> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: `limit` is a valid, writable rlimit for the duration of the call.
    if unsafe { libc::getrlimit(libc::RLIMIT_DATA, &mut limit) } != 0 {
        return Err(ResourceError::MemoryLimit(
            bytes,
            std::io::Error::last_os_error().to_string(),
        ));
    }

    let requested = bytes as libc::rlim_t;
    if limit.rlim_max != libc::RLIM_INFINITY && requested > limit.rlim_max {
        return Err(ResourceError::MemoryLimit(
            bytes,
            format!("exceeds hard limit of {} bytes", limit.rlim_max),
        ));
    }
    limit.rlim_cur = requested;

    // SAFETY: `limit` is a valid rlimit and outlives the call.
    if unsafe { libc::setrlimit(libc::RLIMIT_DATA, &limit) } != 0 {
        return Err(ResourceError::MemoryLimit(
            bytes,
            std::io::Error::last_os_error().to_string(),
        ));
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn limit_system_memory(bytes: u64) -> Result<(), ResourceError> {
    Err(ResourceError::MemoryLimit(
        bytes,
        "memory limiting is not supported on this platform".to_string(),
    ))
}

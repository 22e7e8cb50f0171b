use std::os::unix::fs::MetadataExt;
use std::path::Path;

use nix::unistd::Uid;

pub fn hostname() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .map(|h| h.to_string_lossy().into_owned())
}

pub fn is_root() -> bool {
    Uid::effective().is_root()
}

pub fn copy_ownership(template: &Path, target: &Path) -> std::io::Result<()> {
    let meta = std::fs::metadata(template)?;
    if meta.uid() == Uid::effective().as_raw() && meta.gid() == nix::unistd::getegid().as_raw() {
        // already ours, nothing to change
        return Ok(());
    }
    std::os::unix::fs::chown(target, Some(meta.uid()), Some(meta.gid()))
}

#[cfg(target_os = "linux")]
pub fn identify_port_owner(port: u16) -> Option<String> {
    let tcp_content = std::fs::read_to_string("/proc/net/tcp").ok()?;
    let port_hex = format!("{:04X}", port);

    let mut target_inode: Option<String> = None;
    for line in tcp_content.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }
        // 0A = TCP_LISTEN
        if fields[3] != "0A" {
            continue;
        }
        if let Some(addr_port) = fields[1].split(':').nth(1) {
            if addr_port == port_hex {
                target_inode = Some(fields[9].to_string());
                break;
            }
        }
    }

    let inode = target_inode?;
    if inode == "0" {
        return None;
    }
    let socket_link = format!("socket:[{}]", inode);

    let proc_dir = std::fs::read_dir("/proc").ok()?;
    for entry in proc_dir.flatten() {
        let pid = entry.file_name().to_string_lossy().to_string();
        if !pid.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let Ok(fds) = std::fs::read_dir(format!("/proc/{}/fd", pid)) else {
            continue;
        };
        let owns_socket = fds.flatten().any(|fd| {
            std::fs::read_link(fd.path())
                .map(|link| link.to_string_lossy() == socket_link)
                .unwrap_or(false)
        });
        if !owns_socket {
            continue;
        }
        let cmd = std::fs::read_to_string(format!("/proc/{}/cmdline", pid))
            .map(|c| c.replace('\0', " ").trim().to_string())
            .unwrap_or_default();
        return Some(describe_owner(&pid, &cmd));
    }

    None
}

/// `<cmdline> (PID n)`, with long command lines cut to 57 characters.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn describe_owner(pid: &str, cmd: &str) -> String {
    if cmd.is_empty() {
        return format!("PID {}", pid);
    }
    if cmd.chars().count() > 60 {
        let head: String = cmd.chars().take(57).collect();
        return format!("{}... (PID {})", head, pid);
    }
    format!("{} (PID {})", cmd, pid)
}

#[cfg(not(target_os = "linux"))]
pub fn identify_port_owner(_port: u16) -> Option<String> {
    None
}

use std::path::Path;

pub fn hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok()
}

pub fn is_root() -> bool {
    false
}

pub fn copy_ownership(_template: &Path, _target: &Path) -> std::io::Result<()> {
    Ok(())
}

pub fn identify_port_owner(_port: u16) -> Option<String> {
    None
}

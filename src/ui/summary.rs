use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::compose::ComposeService;
use crate::orchestrator::state::InstalledConfig;

/// One-line description of the installed record.
pub fn describe_install(config: &InstalledConfig) -> String {
    let mut line = format!("profile {} on branch {}", config.profile, config.branch);
    if let Some(at) = config.installed_at {
        line.push_str(&format!(" (installed {})", at.format("%Y-%m-%d %H:%M:%S")));
    }
    line
}

fn ports_text(svc: &ComposeService) -> String {
    let mut ports: Vec<String> = svc
        .publishers
        .iter()
        .filter(|p| p.published_port != 0)
        .map(|p| format!("{}->{}", p.published_port, p.target_port))
        .collect();
    ports.dedup();
    if ports.is_empty() {
        "-".to_string()
    } else {
        ports.join(", ")
    }
}

fn state_text(svc: &ComposeService, use_color: bool) -> String {
    let label = if svc.health.is_empty() {
        svc.state.clone()
    } else {
        format!("{} ({})", svc.state, svc.health)
    };
    if !use_color {
        return format!("\u{25cf} {}", label);
    }
    match svc.state.as_str() {
        "running" if svc.health == "unhealthy" => {
            format!("{} {}", "\u{25cf}".yellow(), label.yellow())
        }
        "running" => format!("{} {}", "\u{25cf}".green(), label.green()),
        "restarting" | "created" => format!("{} {}", "\u{25cf}".yellow(), label.yellow()),
        "exited" | "dead" => format!("{} {}", "\u{25cf}".red(), label.red()),
        _ => format!("\u{25cf} {}", label),
    }
}

/// Render the services table. Colours only apply when `use_color`.
pub fn render_services(services: &[ComposeService], use_color: bool) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Service").set_alignment(CellAlignment::Left),
        Cell::new("Container").set_alignment(CellAlignment::Left),
        Cell::new("Ports").set_alignment(CellAlignment::Left),
        Cell::new("State").set_alignment(CellAlignment::Center),
    ]);

    for svc in services {
        table.add_row(vec![
            Cell::new(&svc.service),
            Cell::new(&svc.name),
            Cell::new(ports_text(svc)),
            Cell::new(state_text(svc, use_color)),
        ]);
    }

    table.to_string()
}

pub fn print_ps(config: &InstalledConfig, services: &[ComposeService]) {
    let use_color = std::io::stdout().is_terminal();

    println!();
    if use_color {
        println!(
            "  {} {} ({})",
            "fednode".bold(),
            config.profile.cyan(),
            config.branch.dimmed()
        );
    } else {
        println!("  fednode {} ({})", config.profile, config.branch);
    }
    println!();

    if services.is_empty() {
        println!("  No containers are running.");
        println!();
        return;
    }

    // Indent the table by 2 spaces
    for line in render_services(services, use_color).lines() {
        println!("  {}", line);
    }
    println!();
}

pub fn print_status(config: Option<&InstalledConfig>) {
    match config {
        Some(config) => println!("Installed: {}", describe_install(config)),
        None => {
            println!("Not installed.");
            println!("Run `fednode install <profile> <branch>` to set up a node.");
        }
    }
}

use promptcell_core::{kernelspec, Config, Paths};
use promptcell_transport::HttpChatTransport;

/// Run full environment diagnostics.
pub async fn run() -> anyhow::Result<()> {
    let paths = Paths::new();

    println!();
    println!("🩺 promptcell doctor — Environment Diagnostics");
    println!("================================");
    println!();

    let mut ok_count = 0u32;
    let mut warn_count = 0u32;
    let mut err_count = 0u32;

    // --- 1. Config ---
    println!("📋 Configuration");
    let config_path = paths.config_file();
    if config_path.exists() {
        print_ok("Config file exists", &config_path.display().to_string());
        ok_count += 1;
    } else {
        print_warn(
            "Config file not found",
            "Defaults in effect; save one to ~/.promptcell/config.json",
        );
        warn_count += 1;
    }

    let config = Config::load_or_default(&paths)?;
    println!("  Transport: {}", config.transport.kind);
    println!("  Endpoint:  {}", config.transport.endpoint);
    println!(
        "  Kernel:    {} ({})",
        config.kernel.spec_name, config.kernel.display_name
    );
    println!();

    // --- 2. Transport ---
    println!("🔌 Transport");
    match config.transport.kind.as_str() {
        "http" => {
            let transport = HttpChatTransport::new(&config.transport.endpoint);
            match transport.probe().await {
                Ok(status) => {
                    print_ok(
                        "Endpoint reachable",
                        &format!("GET {} → HTTP {}", transport.endpoint(), status),
                    );
                    ok_count += 1;
                }
                Err(e) => {
                    print_err("Endpoint unreachable", &e.to_string());
                    err_count += 1;
                }
            }
        }
        "agent" => {
            if config.transport.agent.command.is_empty() {
                print_err(
                    "Agent command not configured",
                    "Set transport.agent.command in config.json",
                );
                err_count += 1;
            } else {
                print_ok("Agent command configured", &config.transport.agent.command);
                ok_count += 1;
                if !config.transport.agent.args.is_empty() {
                    println!("  Args: {}", config.transport.agent.args.join(" "));
                }
            }
        }
        other => {
            print_err(
                &format!("Unknown transport kind '{}'", other),
                "Use \"http\" or \"agent\"",
            );
            err_count += 1;
        }
    }
    println!();

    // --- 3. Kernel ---
    println!("🧠 Kernel");
    let info = kernelspec::kernel_info();
    print_ok(
        &format!("Protocol {}", info.protocol_version),
        &format!("{} {}", info.implementation, info.implementation_version),
    );
    ok_count += 1;
    println!(
        "  Language: {} ({})",
        info.language_info.name, info.language_info.mimetype
    );
    println!();

    // --- Summary ---
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "  ✅ {} passed  ⚠️  {} warnings  ❌ {} errors",
        ok_count, warn_count, err_count
    );

    if err_count > 0 {
        println!();
        println!("  {} error(s) must be fixed before normal use.", err_count);
    } else if warn_count > 0 {
        println!();
        println!("  Core features OK. Some optional features not ready.");
    } else {
        println!();
        println!("  🎉 All good!");
    }
    println!();

    Ok(())
}

fn print_ok(label: &str, detail: &str) {
    if detail.is_empty() {
        println!("  ✅ {}", label);
    } else {
        println!("  ✅ {} — {}", label, detail);
    }
}

fn print_warn(label: &str, hint: &str) {
    if hint.is_empty() {
        println!("  ⚠️  {}", label);
    } else {
        println!("  ⚠️  {} — {}", label, hint);
    }
}

fn print_err(label: &str, hint: &str) {
    if hint.is_empty() {
        println!("  ❌ {}", label);
    } else {
        println!("  ❌ {} — {}", label, hint);
    }
}

use anyhow::Result;

use crate::cli::DoctorArgs;
use crate::config_discovery::load_config_with_discovery;
use crate::merger;
use crate::reload::profile_files;

pub fn run(args: DoctorArgs) -> Result<()> {
    println!("🔍 direnv-reload Doctor\n");

    let mut all_ok = true;

    // Check 1: Configuration
    let file_config = match load_config_with_discovery(args.reload.config.as_deref()) {
        Ok(Some((path, config))) => {
            println!("✅ Configuration found: {}", path.display());
            Some(config)
        }
        Ok(None) => {
            println!("ℹ️  No direnv-reload.toml found, using defaults");
            if args.verbose {
                println!("   Run 'direnv-reload init' in the project to pin it");
            }
            None
        }
        Err(e) => {
            println!("❌ Configuration could not be loaded: {:#}", e);
            all_ok = false;
            None
        }
    };

    let plan = merger::merge(&args.reload, file_config)?;

    // Check 2: Source directory
    if plan.source_dir.is_dir() {
        println!("✅ Source directory: {}", plan.source_dir.display());
    } else {
        println!(
            "❌ Source directory missing: {} (moved?)",
            plan.source_dir.display()
        );
        all_ok = false;
    }

    // Check 3: Environment-declaration file
    if plan.envrc.is_file() {
        println!("✅ Declaration file: {}", plan.envrc.display());
    } else {
        println!(
            "⚠️  Declaration file not found: {} (will be created on reload)",
            plan.envrc.display()
        );
    }

    // Check 4: External tool
    match which::which(&plan.program) {
        Ok(path) => {
            println!("✅ {} found: {}", plan.program, path.display());
            if args.verbose {
                println!("   Force variable: {}=1", plan.force_env);
                println!("   Command: {}", plan.command.join(" "));
            }
        }
        Err(_) => {
            println!("❌ {} not found on PATH", plan.program);
            all_ok = false;
        }
    }

    // Check 5: Cache directory and profiles
    if plan.cache_dir.is_dir() {
        match profile_files(&plan.cache_dir, &plan.profile_glob) {
            Ok(files) => {
                println!(
                    "✅ Cache directory: {} ({} profile file(s) matching {})",
                    plan.cache_dir.display(),
                    files.len(),
                    plan.profile_glob
                );
                if args.verbose {
                    for file in &files {
                        println!("   {}", file.display());
                    }
                }
            }
            Err(e) => {
                println!("❌ Cannot list profile files: {}", e);
                all_ok = false;
            }
        }
    } else {
        println!(
            "ℹ️  Cache directory not yet created: {}",
            plan.cache_dir.display()
        );
    }

    println!();
    if all_ok {
        println!("✅ All checks passed!");
    } else {
        println!("⚠️  Some issues detected. Please fix the items marked with ❌ above.");
        std::process::exit(1);
    }

    Ok(())
}

use anyhow::{anyhow, bail, Context};
use crabtorch::config::{Backend, TorchConfig};
use crabtorch::{BrightnessLevel, TorchController, TorchError, TorchState, OFF, ON};
use std::env;
use std::path::PathBuf;

const USAGE: &str = "Usage: crabtorch-cli [--config <path>] [--simulated] <status|on|off|brightness <level>|constants> [--json]";

struct Options {
    config: Option<PathBuf>,
    simulated: bool,
    json: bool,
    rest: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    crabtorch::init_logging();

    let options = parse_args(env::args().skip(1).collect())?;
    let Some(command) = options.rest.first() else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };

    let mut config = match &options.config {
        Some(path) => TorchConfig::load_layered(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TorchConfig::load_or_default(),
    };
    if options.simulated {
        config.backend = Backend::Simulated;
    }
    log::debug!("Using {:?} backend", config.backend);
    let controller = config.controller();

    match command.as_str() {
        "status" => cmd_status(&controller, options.json),
        "on" => report(controller.set_state(TorchState::On), options.json),
        "off" => report(controller.set_state(TorchState::Off), options.json),
        "brightness" => {
            let level = options
                .rest
                .get(1)
                .ok_or_else(|| anyhow!("brightness requires a level between 0 and 1"))?;
            let level: f64 = level
                .parse()
                .with_context(|| format!("invalid brightness level: {}", level))?;
            report(
                BrightnessLevel::new(level).and_then(|level| controller.set_brightness(level)),
                options.json,
            )
        }
        "constants" => cmd_constants(options.json),
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    }
}

fn parse_args(args: Vec<String>) -> anyhow::Result<Options> {
    let mut options = Options {
        config: None,
        simulated: false,
        json: false,
        rest: Vec::new(),
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config requires a path"))?;
                options.config = Some(PathBuf::from(path));
            }
            "--simulated" => options.simulated = true,
            "--json" => options.json = true,
            _ if arg.starts_with("--") => bail!("Unknown option: {}", arg),
            _ => options.rest.push(arg),
        }
    }

    Ok(options)
}

fn cmd_status(controller: &TorchController, json: bool) -> anyhow::Result<()> {
    let caps = controller.capabilities();
    if json {
        println!("{}", serde_json::to_string(&caps)?);
    } else {
        println!("torch available:         {}", caps.torch_available);
        println!("brightness controllable: {}", caps.brightness_controllable);
        if let Some(id) = &caps.camera_id {
            println!("camera:                  {}", id);
        }
        if let Some(max) = caps.max_strength_level {
            println!("max strength level:      {}", max);
        }
    }
    Ok(())
}

fn cmd_constants(json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::json!({ "ON": ON, "OFF": OFF }));
    } else {
        println!("ON={} OFF={}", ON, OFF);
    }
    Ok(())
}

fn report(result: Result<(), TorchError>, json: bool) -> anyhow::Result<()> {
    match result {
        Ok(()) => {
            if json {
                println!("{{}}");
            } else {
                println!("OK");
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string(&e)?);
            } else {
                eprintln!("{}: {}", e.code(), e);
            }
            std::process::exit(2);
        }
    }
}

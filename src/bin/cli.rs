use anyhow::{anyhow, bail, Context};
use roomkit::config::RoomkitConfig;
use roomkit::layout::{calculate_layout_sizes, AspectRatio, LayoutConstraint, LayoutRequest};
use std::env;

fn main() -> anyhow::Result<()> {
    roomkit::init_logging();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: roomkit-cli <layout|config> [args]");
        std::process::exit(1);
    }

    let command = &args[1];
    match command.as_str() {
        "layout" => cmd_layout(&args),
        "config" => cmd_config(&args),
        _ => {
            eprintln!("Unknown command: {}", command);
            std::process::exit(1);
        }
    }
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> anyhow::Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn parse_aspect(value: &str) -> anyhow::Result<AspectRatio> {
    let (w, h) = value
        .split_once(':')
        .ok_or_else(|| anyhow!("aspect ratio must look like 16:9, got {}", value))?;
    Ok(AspectRatio::new(
        w.parse().context("aspect width")?,
        h.parse().context("aspect height")?,
    ))
}

fn cmd_layout(args: &[String]) -> anyhow::Result<()> {
    // layout --count <n> --width <w> --height <h> [--aspect W:H]
    //        [--max-tiles <n> | --max-rows <n> | --max-cols <n>] [--json]
    let defaults = RoomkitConfig::load_or_default().layout;
    let mut count = None;
    let mut width = None;
    let mut height = None;
    let mut aspect_ratio = defaults.aspect_ratio();
    let mut constraint = defaults.constraint();
    let mut json = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--count" => count = Some(next_value(args, &mut i, "--count")?.parse::<usize>()?),
            "--width" => width = Some(next_value(args, &mut i, "--width")?.parse::<f64>()?),
            "--height" => height = Some(next_value(args, &mut i, "--height")?.parse::<f64>()?),
            "--aspect" => aspect_ratio = parse_aspect(next_value(args, &mut i, "--aspect")?)?,
            "--max-tiles" => {
                constraint = LayoutConstraint::MaxTiles(next_value(args, &mut i, "--max-tiles")?.parse()?)
            }
            "--max-rows" => {
                constraint = LayoutConstraint::MaxRows(next_value(args, &mut i, "--max-rows")?.parse()?)
            }
            "--max-cols" => {
                constraint = LayoutConstraint::MaxCols(next_value(args, &mut i, "--max-cols")?.parse()?)
            }
            "--json" => json = true,
            other => bail!("Unknown option: {}", other),
        }
        i += 1;
    }

    let request = LayoutRequest {
        count: count.context("--count required")?,
        parent_width: width.context("--width required")?,
        parent_height: height.context("--height required")?,
        aspect_ratio,
        constraint,
    };
    let sizes = calculate_layout_sizes(&request)?;

    if json {
        println!("{}", serde_json::to_string(&sizes)?);
    } else {
        println!(
            "first page: {} tiles of {:.1}x{:.1}",
            sizes.tiles_in_first_page, sizes.default_width, sizes.default_height
        );
        if sizes.is_last_page_different_from_first_page {
            println!(
                "last page: tiles of {:.1}x{:.1}",
                sizes.last_page_width, sizes.last_page_height
            );
        }
    }
    Ok(())
}

fn cmd_config(args: &[String]) -> anyhow::Result<()> {
    let config = match args.get(2) {
        Some(path) => RoomkitConfig::load_layered(path)?,
        None => RoomkitConfig::default(),
    };
    config.validate().map_err(|e| anyhow!(e))?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

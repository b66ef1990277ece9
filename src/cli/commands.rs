use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::pipelines::{self, PipelineOutcome};
use crate::settings::ProcessorConfig;
use crate::utils::coordinates::{decimal_to_packed, PackedCoordinate};
use serde_json::json;

pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Convert {
        packed,
        seconds_scale,
    } = &cli.command
    {
        let coordinate = PackedCoordinate::parse(packed, *seconds_scale)?;
        let decimal = coordinate.to_decimal();
        if cli.json {
            let value = json!({
                "packed": packed,
                "seconds_scale": seconds_scale,
                "degrees": coordinate.degrees,
                "minutes": coordinate.minutes,
                "seconds": coordinate.seconds,
                "decimal": decimal,
                "canonical": decimal_to_packed(decimal, *seconds_scale),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{}", decimal);
        }
        return Ok(());
    }

    let mut config = ProcessorConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli.command);

    let outcome = match cli.command {
        Commands::Surface { .. } => {
            tracing::info!("Processing visual surface segment report...");
            pipelines::surface::run(&config)?
        }
        Commands::Relocation { .. } => {
            tracing::info!("Calculating relocation distances...");
            pipelines::relocation::run(&config)?
        }
        Commands::Significant { .. } => {
            tracing::info!("Collecting significant obstacles...");
            pipelines::significant::run(&config, cli.quiet || cli.json)?
        }
        Commands::Unclear { .. } => {
            tracing::info!("Collecting unclear obstacles...");
            pipelines::unclear::run(&config)?
        }
        Commands::Convert { .. } => return Ok(()),
    };

    report(&outcome, cli.json)
}

/// CLI arguments take precedence over file and environment settings
pub fn apply_overrides(config: &mut ProcessorConfig, command: &Commands) {
    match command {
        Commands::Surface {
            input,
            output,
            preamble_lines,
            seconds_scale,
            ident_column,
        } => {
            let surface = &mut config.surface;
            override_with(&mut surface.input, input);
            override_with(&mut surface.output, output);
            if let Some(lines) = preamble_lines {
                surface.preamble_lines = *lines;
            }
            if let Some(scale) = seconds_scale {
                surface.seconds_scale = *scale;
            }
            if let Some(column) = ident_column {
                surface.ident_column = column.clone();
            }
        }
        Commands::Relocation {
            current,
            previous,
            site,
            output,
            geometry,
        } => {
            let relocation = &mut config.relocation;
            override_with(&mut relocation.current, current);
            override_with(&mut relocation.previous, previous);
            override_with(&mut relocation.site, site);
            override_with(&mut relocation.output, output);
            if let Some(kind) = geometry {
                relocation.geometry.kind = *kind;
            }
        }
        Commands::Significant {
            root,
            output,
            min_height,
        } => {
            let significant = &mut config.significant;
            override_with(&mut significant.root, root);
            override_with(&mut significant.output, output);
            if let Some(height) = min_height {
                significant.min_height_m = *height;
            }
        }
        Commands::Unclear {
            obstacles,
            registry,
            site,
            output,
        } => {
            let unclear = &mut config.unclear;
            override_with(&mut unclear.obstacles, obstacles);
            override_with(&mut unclear.registry, registry);
            override_with(&mut unclear.site, site);
            override_with(&mut unclear.output, output);
        }
        Commands::Convert { .. } => {}
    }
}

fn override_with<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        target.clone_from(value);
    }
}

fn report(outcome: &PipelineOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", outcome);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::GeometryKind;
    use crate::utils::SecondsScale;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_take_precedence() {
        let cli = Cli::parse_from([
            "obstacle-processor",
            "relocation",
            "--current",
            "now.csv",
            "--previous",
            "then.csv",
            "--site",
            "EFHK",
            "--geometry",
            "packed",
        ]);

        let mut config = ProcessorConfig::default();
        config.relocation.site = Some("EFTP".to_string());
        apply_overrides(&mut config, &cli.command);

        assert_eq!(config.relocation.current, Some(PathBuf::from("now.csv")));
        assert_eq!(config.relocation.site.as_deref(), Some("EFHK"));
        assert_eq!(config.relocation.geometry.kind, GeometryKind::Packed);
        assert_eq!(config.relocation.output, None);
    }

    #[test]
    fn test_surface_arguments() {
        let cli = Cli::parse_from([
            "obstacle-processor",
            "--quiet",
            "surface",
            "-i",
            "report.txt",
            "--seconds-scale",
            "whole",
            "--ident-column",
            "ID",
        ]);
        assert!(cli.quiet);

        let mut config = ProcessorConfig::default();
        apply_overrides(&mut config, &cli.command);
        assert_eq!(config.surface.input, Some(PathBuf::from("report.txt")));
        assert_eq!(config.surface.seconds_scale, SecondsScale::Whole);
        assert_eq!(config.surface.ident_column, "ID");
        assert_eq!(config.surface.preamble_lines, 40);
    }

    #[test]
    fn test_convert_command() {
        let cli = Cli::parse_from(["obstacle-processor", "convert", "603000"]);
        assert!(run(cli).is_ok());

        let bad = Cli::parse_from(["obstacle-processor", "convert", "6x"]);
        assert!(run(bad).is_err());
    }
}

//! `lensfx simulate`: drive an effect player over the recording engine.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use lensfx_core::{PixelBuffer, PixelLayout, Plane, PlaneStructure, Rotation};
use lensfx_player::{
    DrawReport, EffectPlayer, EngineCall, PlaybackState, RecordingFactory, SurfaceState,
};

#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a lensfx.toml file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Surface width
    #[arg(long, default_value_t = 720)]
    width: u32,

    /// Surface height
    #[arg(long, default_value_t = 1280)]
    height: u32,

    /// Pixel layout of the pushed frames (name or raw code)
    #[arg(long, default_value = "nv12_bt601_video")]
    layout: String,

    /// Frame rotation in degrees
    #[arg(long, default_value_t = 0)]
    rotation: i32,

    /// Number of frames to push and draw
    #[arg(long, default_value_t = 3)]
    frames: u32,

    /// Effect to load before playback
    #[arg(long, default_value = "effects/default")]
    effect: String,

    /// Render attempts the engine reports as not ready on the first draw
    #[arg(long, default_value_t = 0)]
    not_ready: u32,

    /// Include the full engine call log in the output
    #[arg(long)]
    trace: bool,
}

#[derive(Serialize)]
struct Summary {
    layout: PixelLayout,
    frames_pushed: usize,
    frames_dropped: u32,
    draws: Vec<DrawReport>,
    framebuffer: Option<(u32, u32)>,
    surface: SurfaceState,
    playback: PlaybackState,
    #[serde(skip_serializing_if = "Option::is_none")]
    calls: Option<Vec<EngineCall>>,
}

/// Synthetic plane contents for a layout at the given size.
fn synthetic_planes(layout: PixelLayout, width: u32, height: u32) -> Vec<(Vec<u8>, usize)> {
    let (w, h) = (width as usize, height as usize);
    let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));
    match layout.plane_structure() {
        Some(PlaneStructure::SemiPlanar) => {
            vec![(vec![16; w * h], w), (vec![128; cw * 2 * ch], cw * 2)]
        }
        Some(PlaneStructure::FullyPlanar) => vec![
            (vec![16; w * h], w),
            (vec![128; cw * ch], cw),
            (vec![128; cw * ch], cw),
        ],
        Some(PlaneStructure::Packed) | None => {
            let bpp = if layout.is_packed() {
                lensfx_core::classify::pixel_format(layout).bytes_per_pixel()
            } else {
                4
            };
            vec![(vec![0; w * h * bpp], w * bpp)]
        }
    }
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = crate::load_config(args.config)?;
    let layout: PixelLayout = args
        .layout
        .parse()
        .with_context(|| format!("cannot parse pixel layout '{}'", args.layout))?;
    let rotation = Rotation::from_degrees(args.rotation);

    let factory = RecordingFactory::new().not_ready_for(args.not_ready);
    let mut player = EffectPlayer::from_config(&config, &factory)?;

    player.surface_created(args.width, args.height)?;
    if let Err(e) = player.load_effect(&args.effect) {
        tracing::warn!("Effect '{}' not loaded: {}", args.effect, e);
    }
    player.resume();

    let planes = synthetic_planes(layout, args.width, args.height);
    let mut draws = Vec::new();
    let mut dropped = 0;
    for index in 0..args.frames {
        let views = planes
            .iter()
            .map(|(data, stride)| Plane::new(data, *stride))
            .collect();
        let buffer = PixelBuffer::new(args.width, args.height, layout, views);
        if player.push_frame(&buffer, rotation).is_err() {
            dropped += 1;
            continue;
        }
        let report = if player.draw_policy().is_bounded() {
            player
                .draw_bounded()
                .with_context(|| format!("frame {} was never rendered", index))?
        } else {
            player.draw()
        };
        draws.push(report);
    }

    player.stop();
    let framebuffer = player.framebuffer_size();
    player.surface_destroyed();

    let log = factory.log();
    let summary = Summary {
        layout,
        frames_pushed: log.pushed_frames().len(),
        frames_dropped: dropped,
        draws,
        framebuffer,
        surface: player.surface_state(),
        playback: player.playback_state(),
        calls: args.trace.then(|| log.calls()),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

//! Runs the hand tracker over a directory of frames, using recorded detections in place of a
//! live model.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use handmarks::{
    config::TrackerConfig,
    hand::{replay::ReplayProvider, tracker::HandTracker},
    image::{draw, Image},
    landmark::LandmarkIdx,
    timer::{FpsCounter, FrameRate},
    video::{FrameSource, ImageSequence},
};

/// Extracts hand geometry from a sequence of frames.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory with the input frames (PNG or JPEG, processed in file name order).
    #[arg(long)]
    frames: PathBuf,
    /// JSON Lines file with one recorded detection result per frame.
    #[arg(long)]
    detections: PathBuf,
    /// Directory to write the annotated frames to.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Configuration file. Defaults are used if it doesn't exist.
    #[arg(short, long, default_value = "handmarks.json")]
    config: PathBuf,
    /// Index of the detected hand to extract.
    #[arg(long)]
    hand: Option<usize>,
    /// Pair of landmarks to measure the distance between, e.g. `4,8`.
    #[arg(long, value_parser = parse_landmark_pair)]
    measure: Option<(usize, usize)>,
    /// Mirror frames horizontally before detection.
    #[arg(long, default_value_t = false)]
    mirror: bool,
    /// Don't draw any annotations onto the frames.
    #[arg(long, default_value_t = false)]
    no_draw: bool,
    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,
}

fn parse_landmark_pair(s: &str) -> Result<(usize, usize), String> {
    let parse = |id: &str| -> Result<usize, String> {
        let id = id.trim().parse::<usize>().map_err(|e| format!("'{id}': {e}"))?;
        LandmarkIdx::from_index(id).map_err(|e| e.to_string())?;
        Ok(id)
    };
    let Some((a, b)) = s.split_once(',') else {
        return Err(format!("expected two comma-separated landmark ids, got '{s}'"));
    };
    Ok((parse(a)?, parse(b)?))
}

fn main() -> anyhow::Result<()> {
    handmarks::init_logger!();

    let args = Args::parse();
    let mut config = TrackerConfig::load(&args.config)?;
    if let Some(hand) = args.hand {
        config.hand_index = hand;
    }
    if args.measure.is_some() {
        config.measure = args.measure;
    }
    config.mirror |= args.mirror;
    config.validate()?;
    let draw = !args.no_draw;

    if let Some(out) = &args.output {
        fs::create_dir_all(out)
            .with_context(|| format!("failed to create output directory '{}'", out.display()))?;
    }

    let mut frames = ImageSequence::open(&args.frames)?;
    if frames.is_empty() {
        bail!("no frames found in '{}'", args.frames.display());
    }
    let provider = ReplayProvider::open(&args.detections, config.provider.clone())?;
    let mut tracker = HandTracker::new(provider).with_style(config.style.clone());

    let mut fps = FpsCounter::new("handmarks");
    let mut frame_rate = FrameRate::new();
    let mut processed = 0;
    loop {
        if args.max_frames.map_or(false, |max| processed >= max) {
            break;
        }
        let Some(mut frame) = frames.read()? else {
            break;
        };
        let current_fps = frame_rate.tick();
        if config.mirror {
            frame.flip_horizontal_in_place();
        }

        tracker
            .find_hands(&mut frame, draw)
            .with_context(|| format!("detection failed on frame {processed}"))?;
        process_hand(&mut tracker, &mut frame, &config, draw, processed);

        if draw {
            let label = format!("{}", current_fps as i32);
            draw::text(&mut frame, 10, 70, &label)
                .color(tracker.style().fps_color)
                .large()
                .align_left();
        }

        if let Some(out) = &args.output {
            let path = match frames.current_path().and_then(|p| p.file_name()) {
                Some(name) => out.join(name),
                None => out.join(format!("frame_{processed:05}.png")),
            };
            frame.save(&path)?;
        }

        fps.tick_with(frames.timers().into_iter().chain(tracker.timers()));
        processed += 1;
    }

    log::info!("processed {processed} frames");
    Ok(())
}

fn process_hand(
    tracker: &mut HandTracker<ReplayProvider>,
    frame: &mut Image,
    config: &TrackerConfig,
    draw: bool,
    frame_no: usize,
) {
    let report = match tracker.find_position(frame, config.hand_index, draw) {
        Ok(position) if position.is_empty() => {
            log::debug!("frame {frame_no}: no hand");
            return;
        }
        Ok(position) => position.landmarks().get(config.report_landmark).copied(),
        Err(e) => {
            log::warn!("frame {frame_no}: {e}");
            return;
        }
    };

    if let Some(lm) = report {
        log::info!("frame {frame_no}: {:?} at ({}, {})", lm.id, lm.x, lm.y);
    }
    match tracker.fingers_up() {
        Ok(fingers) => log::info!(
            "frame {frame_no}: {} fingers up ({fingers})",
            fingers.count_extended()
        ),
        Err(e) => log::warn!("frame {frame_no}: {e}"),
    }
    if let Some((a, b)) = config.measure {
        match tracker.distance(a, b, frame, draw) {
            Ok(d) => log::info!("frame {frame_no}: distance {a}-{b} is {:.1}px", d.length()),
            Err(e) => log::warn!("frame {frame_no}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_pair() {
        assert_eq!(parse_landmark_pair("4,8"), Ok((4, 8)));
        assert_eq!(parse_landmark_pair(" 0 , 20 "), Ok((0, 20)));
        assert!(parse_landmark_pair("4").is_err());
        assert!(parse_landmark_pair("4,x").is_err());
        assert!(parse_landmark_pair("4,21").unwrap_err().contains("out of range"));
    }

    #[test]
    fn args() {
        let args = Args::try_parse_from([
            "handmarks",
            "--frames",
            "in",
            "--detections",
            "rec.jsonl",
            "--measure",
            "4,8",
            "--no-draw",
        ])
        .unwrap();
        assert_eq!(args.measure, Some((4, 8)));
        assert!(args.no_draw);
        assert_eq!(args.config, PathBuf::from("handmarks.json"));
        assert!(Args::try_parse_from(["handmarks", "--frames", "in"]).is_err());
    }
}

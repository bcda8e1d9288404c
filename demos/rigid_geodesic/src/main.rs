use argh::FromArgs;
use glam::DVec3;
use kornia_rigid::{Deriv, Quaternion, Rigid3};

#[derive(FromArgs)]
/// Sample the SE(3) geodesic between two poses
struct Args {
    /// start pose as "tx,ty,tz,rx,ry,rz" (translation, then axis-angle)
    #[argh(option, from_str_fn(parse_pose), default = "Rigid3::IDENTITY")]
    start: Rigid3,

    /// end pose as "tx,ty,tz,rx,ry,rz" (translation, then axis-angle)
    #[argh(option, from_str_fn(parse_pose))]
    end: Rigid3,

    /// number of intervals along the geodesic
    #[argh(option, short = 'n', default = "10")]
    steps: usize,
}

fn parse_pose(value: &str) -> Result<Rigid3, String> {
    let values = value
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid pose '{value}': {e}"))?;

    let [tx, ty, tz, rx, ry, rz] = values[..] else {
        return Err(format!(
            "invalid pose '{value}': expected 6 values, got {}",
            values.len()
        ));
    };

    Ok(Rigid3::new(
        DVec3::new(tx, ty, tz),
        Quaternion::exp(DVec3::new(rx, ry, rz)),
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.steps == 0 {
        return Err("steps must be at least 1".into());
    }

    // body velocity that carries start onto end in unit time
    let delta = (args.start.inv() * args.end).log();
    log::info!(
        "body velocity: linear {} angular {}",
        delta.linear,
        delta.angular
    );

    for i in 0..=args.steps {
        let t = i as f64 / args.steps as f64;
        let pose = args.start * Rigid3::exp(&Deriv::new(delta.linear * t, delta.angular * t));
        let (axis, angle) = pose.orient.axis_angle();

        println!("t = {t:.3}");
        println!("  center: {}", pose.center);
        println!(
            "  orient: {:?} (axis {:?}, angle {angle:.4})",
            pose.orient.to_array(),
            axis
        );
        println!("  matrix: {}", pose.matrix());
    }

    let reached = args.start * Rigid3::exp(&delta);
    log::debug!(
        "end point error: translation {:e}, rotation {:e}",
        (reached.center - args.end.center).length(),
        (reached.orient.inv() * args.end.orient).angle()
    );

    Ok(())
}

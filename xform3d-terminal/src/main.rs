/// xform3d Terminal Viewer - interactive affine transforms of the letter "П"
///
/// Controls:
///   - 1-5: pick scale / translate / rotate / custom-axis / view
///   - x/X, y/Y, z/Z (or arrows, PgUp/PgDn): adjust the picked group
///   - a: next custom axis preset
///   - s/t/r/0: reset scale / translate / rotation / everything
///   - v/V: starting view / no view orbit
///   - f/w/l: toggle faces / wireframe / labels
///   - q/ESC: quit
use clap::Parser;
use std::io;
use xform3d_core::{Float, Mesh, PerspectiveCamera};
use xform3d_terminal::{RenderOptions, TerminalApp, ViewConfig};

#[derive(Parser, Debug)]
#[command(about = "Interactive 3D affine transformation viewer for the terminal")]
struct Args {
    /// Perspective viewer distance
    #[arg(long, default_value_t = PerspectiveCamera::DEFAULT_DISTANCE)]
    distance: Float,

    /// Rows per model unit in the perspective view (fitted to the terminal if omitted)
    #[arg(long)]
    scale: Option<Float>,

    /// Rows per model unit in the projection views (fitted if omitted)
    #[arg(long)]
    projection_scale: Option<Float>,

    /// Starting view orbit as X,Y,Z degrees
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "30,45,0"
    )]
    view: Vec<Float>,

    /// Start with faces hidden
    #[arg(long)]
    no_faces: bool,

    /// Start with vertex labels hidden
    #[arg(long)]
    no_labels: bool,
}

impl Args {
    fn into_config(self) -> io::Result<ViewConfig> {
        let initial_view: [Float; 3] = self.view.as_slice().try_into().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("--view expects three comma-separated angles, got {}", self.view.len()),
            )
        })?;

        Ok(ViewConfig {
            distance: self.distance,
            scale: self.scale,
            projection_scale: self.projection_scale,
            initial_view,
            options: RenderOptions {
                show_faces: !self.no_faces,
                show_wireframe: true,
                show_labels: !self.no_labels,
            },
        })
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; redirect it when enabling RUST_LOG
    env_logger::builder().init();

    let config = args.into_config()?;
    let mesh = Mesh::letter_p();
    log::info!("loaded model: {}", mesh.description());

    let mut app = TerminalApp::new(mesh, config);
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> io::Result<ViewConfig> {
        let argv = std::iter::once("xform3d-terminal").chain(args.iter().copied());
        Args::parse_from(argv).into_config()
    }

    #[test]
    fn test_default_options() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.initial_view, [30.0, 45.0, 0.0]);
    }

    #[test]
    fn test_negative_view_angles() {
        let config = config_from(&["--view", "-10,5,0"]).unwrap();
        assert_eq!(config.initial_view, [-10.0, 5.0, 0.0]);

        let config = config_from(&["--view=0,-90,-45"]).unwrap();
        assert_eq!(config.initial_view, [0.0, -90.0, -45.0]);
    }

    #[test]
    fn test_view_needs_three_angles() {
        let err = config_from(&["--view", "-10"]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(config_from(&["--view", "1,2,3,4"]).is_err());
    }

    #[test]
    fn test_flags_and_camera_options() {
        let config = config_from(&["--distance", "150", "--scale", "4", "--no-faces", "--no-labels"]).unwrap();
        assert_eq!(config.distance, 150.0);
        assert_eq!(config.scale, Some(4.0));
        assert_eq!(config.projection_scale, None);
        assert!(!config.options.show_faces);
        assert!(!config.options.show_labels);
        assert!(config.options.show_wireframe);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        assert!(Args::try_parse_from(["xform3d-terminal", "--bogus"]).is_err());
    }
}

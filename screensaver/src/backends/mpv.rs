//! Utils for generating command and summoning `mpv`.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use crate::backends::Player;
use crate::config::Config;

/// Window title of every instance. Compositors can match on it to let the window take focus.
pub const TITLE: &str = "MPVScreensaver";

/// Quits on any button or key, but not on mouse movement.
const INPUT_CONF: &str = "\
MOUSE_MOVE ignore
MOUSE_ENTER ignore
MOUSE_LEAVE ignore
MBTN_LEFT quit
MBTN_RIGHT quit
MBTN_MID quit
WHEEL_UP quit
WHEEL_DOWN quit
UNMAPPED quit
";

pub struct Mpv {
    binary: String,
    config_dir: PathBuf,
    image_duration: Duration,
    audio: bool,
    options: BTreeMap<String, String>,
}

impl Player for Mpv {
    fn binary(&self) -> &str {
        &self.binary
    }

    fn prepare(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::write(self.config_dir.join("input.conf"), INPUT_CONF)?;
        Ok(())
    }

    fn get_sys_command(&self, display: u32, playlist: &[OsString]) -> Command {
        let mut sys_cmd = Command::new(&self.binary);
        // Keeps the user's own mpv.conf out, and picks up our input.conf
        sys_cmd.arg(format!("--config-dir={}", self.config_dir.display()));
        sys_cmd
            .arg("--fullscreen")
            .arg(format!("--fs-screen={display}"))
            .arg("--loop-playlist=inf");
        if playlist.len() == 1 {
            sys_cmd.arg("--loop-file=inf");
        }
        sys_cmd.args([
            "--no-border",
            "--ontop",
            "--osc=no",
            "--osd-level=0",
            "--no-input-default-bindings",
            // `always` hides the pointer right away instead of after the first movement
            "--cursor-autohide=always",
            "--stop-screensaver=no",
        ]);
        sys_cmd.arg(format!("--title={TITLE}"));
        sys_cmd.arg(format!(
            "--image-display-duration={}",
            self.image_duration.as_secs_f64()
        ));
        if !self.audio {
            sys_cmd.arg("--ao=null");
        }
        for (key, value) in &self.options {
            sys_cmd.arg(format!("--{key}={value}"));
        }

        sys_cmd.arg("--").args(playlist);
        sys_cmd
    }
}

impl Mpv {
    pub fn new(config: &Config) -> Self {
        // Options from the configuration replace the defaults of the same name
        let mut options = default_options();
        options.extend(config.options.clone());
        Self {
            binary: config.player.clone(),
            config_dir: config.cache_dir.clone(),
            image_duration: config.image_duration,
            audio: config.audio,
            options,
        }
    }
}

fn default_options() -> BTreeMap<String, String> {
    let mut options = BTreeMap::new();
    // Hardware decoding saves power but may glitch on some drivers
    options.insert(String::from("hwdec"), String::from("no"));
    options.insert(String::from("vo"), String::from("gpu-next"));
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::pretty_print;

    fn test_config() -> Config {
        Config {
            cache_dir: PathBuf::from("/tmp/mpvss-dev"),
            ..Config::default()
        }
    }

    #[test]
    fn getting_cmd() {
        let mpv = Mpv::new(&test_config());
        let cmd = mpv.get_sys_command(1, &[OsString::from("video.mkv")]);
        assert_eq!(
            pretty_print(&cmd),
            "mpv --config-dir=/tmp/mpvss-dev --fullscreen --fs-screen=1 --loop-playlist=inf \
             --loop-file=inf --no-border --ontop --osc=no --osd-level=0 \
             --no-input-default-bindings --cursor-autohide=always --stop-screensaver=no \
             --title=MPVScreensaver --image-display-duration=7 --ao=null --hwdec=no \
             --vo=gpu-next -- video.mkv"
        );
    }

    #[test]
    fn fixed_flags_always_present() {
        let mpv = Mpv::new(&test_config());
        let playlists = [
            vec![OsString::from("a.jpg"), OsString::from("b.mp3")],
            vec![OsString::from("--fullscreen=no")],
            vec![OsString::from("https://example.com/x.webm"); 3],
        ];
        for playlist in &playlists {
            let cmd = mpv.get_sys_command(0, playlist);
            let args: Vec<OsString> = cmd.get_args().map(ToOwned::to_owned).collect();
            let separator = args.iter().position(|arg| *arg == "--").unwrap();
            let (flags, items) = args.split_at(separator);
            for flag in ["--fullscreen", "--loop-playlist=inf", "--no-border"] {
                assert!(flags.iter().any(|arg| *arg == flag), "{flag} missing");
            }
            assert_eq!(&items[1..], playlist.as_slice());
        }
    }

    #[test]
    fn loop_file_only_for_single_item() {
        let mpv = Mpv::new(&test_config());
        let cmd = mpv.get_sys_command(0, &[OsString::from("a.jpg"), OsString::from("b.jpg")]);
        assert!(!pretty_print(&cmd).contains("--loop-file"));
    }

    #[test]
    fn applying_options() {
        let mut config = test_config();
        config.audio = true;
        config.image_duration = Duration::from_millis(1500);
        config
            .options
            .insert(String::from("hwdec"), String::from("vaapi"));
        config
            .options
            .insert(String::from("volume"), String::from("40"));
        let cmd = Mpv::new(&config).get_sys_command(0, &[OsString::from("a.mkv")]);
        let line = pretty_print(&cmd);
        assert!(!line.contains("--ao=null"));
        assert!(line.contains("--image-display-duration=1.5"));
        assert!(line.contains("--hwdec=vaapi --vo=gpu-next --volume=40 --"));
        assert!(!line.contains("--hwdec=no"));
    }

    #[test]
    fn config_options_replace_defaults() {
        let mut config = test_config();
        config.options.insert(String::from("vo"), String::from("x11"));
        config
            .options
            .insert(String::from("panscan"), String::from("1.0"));
        let mpv = Mpv::new(&config);
        let mut expected = BTreeMap::new();
        expected.insert(String::from("hwdec"), String::from("no"));
        expected.insert(String::from("panscan"), String::from("1.0"));
        expected.insert(String::from("vo"), String::from("x11"));
        assert_eq!(mpv.options, expected);
        // the configuration itself is left alone
        assert_eq!(config.options.len(), 2);
    }

    #[test]
    fn passing_non_utf8_items() {
        use std::os::unix::ffi::OsStrExt;

        let latin1 = std::ffi::OsStr::from_bytes(b"caf\xe9.mkv").to_os_string();
        let cmd = Mpv::new(&test_config()).get_sys_command(0, std::slice::from_ref(&latin1));
        assert_eq!(cmd.get_args().last(), Some(latin1.as_os_str()));
    }

    #[test]
    fn preparing_config_dir() {
        let dir = std::env::temp_dir().join("mpvss-prepare-test");
        let config = Config {
            cache_dir: dir.clone(),
            ..Config::default()
        };
        Mpv::new(&config).prepare().unwrap();
        let written = fs::read_to_string(dir.join("input.conf")).unwrap();
        assert!(written.contains("MOUSE_MOVE ignore"));
        assert!(written.contains("UNMAPPED quit"));
        fs::remove_dir_all(&dir).unwrap();
    }
}

// SPDX-License-Identifier: MPL-2.0
use iced_dehaze::app::{self, Flags};
use iced_dehaze::domain::media::Variant;

const HELP: &str = "\
iced_dehaze - upload hazy images or videos and view the dehazed result

USAGE:
  iced_dehaze [OPTIONS] [FILE]

OPTIONS:
  --lang <LOCALE>        UI language (e.g. en-US, fr)
  --config-dir <DIR>     Directory holding settings.toml
  --endpoint <URL>       Dehazing service endpoint
  --variant <VARIANT>    Workflow: image-only or combined
  -h, --help             Print this help
";

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    Ok(Flags {
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        endpoint: args.opt_value_from_str("--endpoint")?,
        variant: args.opt_value_from_fn("--variant", str::parse::<Variant>)?,
        file_path: args
            .finish()
            .into_iter()
            .next()
            .and_then(|s| s.into_string().ok()),
    })
}

fn main() -> iced::Result {
    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(error) => {
            eprintln!("error: {error}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    app::run(flags)
}

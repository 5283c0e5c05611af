use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "nscss")]
#[command(about = "SCSS-subset to CSS compiler")]
pub struct Cli {
    /// SCSS source text to compile.
    pub source: Option<String>,

    /// Write the CSS to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

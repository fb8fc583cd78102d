use clarg::{CommandLineParser, Optional, Parameter, Scalar};
use std::path::PathBuf;

fn main() {
    let mut config: PathBuf = PathBuf::default();
    let mut verbose: bool = false;
    let mut level: String = String::default();
    let mut input: Option<String> = None;

    let parser = CommandLineParser::new("basic")
        .version("0.1.0")
        .about("Loads a config file, and optionally processes an input.")
        .add_help()
        .add_version()
        .add(
            Parameter::option(Scalar::new(&mut config), ["-c", "--cfg"])
                .required()
                .help("The config file."),
        )
        .add(
            Parameter::option(Scalar::new(&mut verbose), ["-v", "--verbose"])
                .flag()
                .help("Print more output."),
        )
        .add(
            Parameter::option(Scalar::new(&mut level), ["--level"])
                .choices(["low", "high"])
                .default_value("low".to_string())
                .callback(|level: &String| println!("Running at level: {level}"))
                .help("The processing level."),
        )
        .add(Parameter::positional(Optional::new(&mut input), "INPUT").help("The input to process."))
        .build();

    parser.parse();
    println!("Config: {}", config.display());
    println!("Verbose: {verbose}");
    println!("Level: {level}");
    println!("Input: {input:?}");
}

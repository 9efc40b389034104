use modcli::{CommandLineInterface, ErrorHandling, Flag, Positional, SubCommand, ValidationError};

fn main() {
    let mut cli = CommandLineInterface::create([(
        "test",
        SubCommand::new(ErrorHandling::ExitOnError)
            .about("Import files into an instance.")
            .positional(
                Positional::string("instance_type", 0)
                    .help("The instance type to import into.")
                    .validator(|value| match value.as_string() {
                        Some(instance) if instance.contains("s3") => Ok(()),
                        _ => Err(ValidationError::new("invalid instance type, must be 's3'")),
                    }),
            )
            .flag(
                Flag::string("file")
                    .required()
                    .help("File to import (*.ext)")
                    .validator(|value| match value.as_string() {
                        Some(file) if file.contains(".ext") => Ok(()),
                        _ => Err(ValidationError::new("filetype must be .ext")),
                    }),
            )
            .flag(
                Flag::bool("recursive")
                    .default(false)
                    .help("Import the files recursively."),
            )
            .flag(
                Flag::int("count")
                    .default(4)
                    .help("How many files to import."),
            ),
    )])
    .expect("Invalid command line interface configuration");

    let command = match cli.parse() {
        Ok(command) => command,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    for value in command.positionals().chain(command.flags()) {
        println!("{name}: {value}", name = value.name());
    }
}

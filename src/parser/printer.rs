use terminal_size::{terminal_size, Width};

use crate::api::FieldDescriptor;
use crate::constant::*;
use crate::model::{ArgType, Value};
use crate::parser::interface::{chunk, ColumnRenderer, UserInterface};
use crate::parser::{FlagSet, Positionals};

const DEFAULT_TOTAL_WIDTH: usize = 80;
const MAIN_INDENT: usize = 1;

/// Renders the usage of a sub-command.
#[derive(Debug)]
pub(crate) struct Printer {
    terminal_width: Option<usize>,
}

impl Printer {
    pub(crate) fn terminal() -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(terminal_width)
    }

    pub(crate) fn new(terminal_width: Option<usize>) -> Self {
        Self { terminal_width }
    }

    pub(crate) fn print_help(
        &self,
        program: &str,
        about: Option<&str>,
        positionals: &Positionals,
        flags: &FlagSet,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        user_interface.print(self.render(program, about, positionals, flags).join("\n"));
    }

    /// Like [`Printer::print_help`], but on the error channel.
    pub(crate) fn print_error_context(
        &self,
        program: &str,
        about: Option<&str>,
        positionals: &Positionals,
        flags: &FlagSet,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        user_interface
            .print_error_context(self.render(program, about, positionals, flags).join("\n"));
    }

    pub(crate) fn render(
        &self,
        program: &str,
        about: Option<&str>,
        positionals: &Positionals,
        flags: &FlagSet,
    ) -> Vec<String> {
        let total_width = self.terminal_width.unwrap_or(DEFAULT_TOTAL_WIDTH);
        let mut ordered: Vec<&FieldDescriptor> =
            positionals.slots().iter().map(|slot| slot.descriptor()).collect();
        ordered.sort_by_key(|descriptor| descriptor.position());
        let help_declared = flags.contains(HELP_NAME);

        let mut summary = vec!["usage:".to_string(), program.to_string()];
        let mut argument_rows: Vec<(String, String)> = Vec::default();
        let mut option_rows: Vec<(String, String)> = Vec::default();

        for descriptor in &ordered {
            let name = metavar(descriptor.name());
            let mut notes = Vec::default();

            if let Some(position) = descriptor.position() {
                notes.push(format!("[position {position}]"));
            }

            summary.push(name.clone());
            argument_rows.push((name, describe(descriptor.help(), notes)));
        }

        if !help_declared {
            let grammar = format!("{FLAG_PREFIX}{HELP_NAME}");
            summary.push(format!("[{grammar}]"));
            option_rows.push((grammar, HELP_MESSAGE.to_string()));
        }

        for slot in flags.slots() {
            let descriptor = slot.descriptor();
            let grammar = grammar(descriptor);
            let mut notes = Vec::default();

            if descriptor.is_required() {
                summary.push(grammar.clone());
                notes.push("[required]".to_string());
            } else {
                summary.push(format!("[{grammar}]"));
            }

            match descriptor.default_value() {
                Some(value) if Some(value) == Value::zero(descriptor.arg_type()).as_ref() => {}
                Some(Value::String(value)) => notes.push(format!("[default: \"{value}\"]")),
                Some(value) => notes.push(format!("[default: {value}]")),
                None => {}
            }

            option_rows.push((grammar, describe(descriptor.help(), notes)));
        }

        let left_column_width = argument_rows
            .iter()
            .chain(option_rows.iter())
            .map(|(left, _)| left.chars().count())
            .max()
            .unwrap_or_default();
        let renderer = ColumnRenderer::guided(MAIN_INDENT, left_column_width, total_width);
        let mut lines = vec![summary.join(" ")];

        if let Some(about) = about {
            lines.push("".to_string());
            lines.extend(chunk(about, total_width));
        }

        if !argument_rows.is_empty() {
            lines.push("".to_string());
            lines.push("positional arguments:".to_string());

            for (left, middle) in &argument_rows {
                lines.extend(renderer.render(left, middle));
            }
        }

        if !option_rows.is_empty() {
            lines.push("".to_string());
            lines.push("options:".to_string());

            for (left, middle) in &option_rows {
                lines.extend(renderer.render(left, middle));
            }
        }

        lines
    }
}

fn metavar(name: &str) -> String {
    name.to_ascii_uppercase().replace('-', "_")
}

fn grammar(descriptor: &FieldDescriptor) -> String {
    match descriptor.arg_type() {
        ArgType::Bool => format!("{FLAG_PREFIX}{n}", n = descriptor.name()),
        _ => format!(
            "{FLAG_PREFIX}{n} {m}",
            n = descriptor.name(),
            m = metavar(descriptor.name())
        ),
    }
}

fn describe(help: Option<&str>, notes: Vec<String>) -> String {
    help.into_iter()
        .map(str::to_string)
        .chain(notes)
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Flag, Positional};
    use crate::parser::util::InMemoryInterface;
    use crate::test::assert_contains;

    fn flags() -> FlagSet {
        let mut flags = FlagSet::default();
        flags
            .bind(
                Flag::string("file")
                    .default("")
                    .required()
                    .help("File to import (*.ext)")
                    .consume(),
            )
            .unwrap();
        flags
            .bind(Flag::bool("recursive").default(false).consume())
            .unwrap();
        flags
            .bind(
                Flag::int("count")
                    .default(4)
                    .help("How many files to count")
                    .consume(),
            )
            .unwrap();
        flags
    }

    fn positionals() -> Positionals {
        let mut positionals = Positionals::default();
        positionals
            .register(
                Positional::string("instance-type", 1)
                    .help("The instance type.")
                    .consume(),
            )
            .unwrap();
        positionals
            .register(Positional::int("zone", 0).consume())
            .unwrap();
        positionals
    }

    #[test]
    fn render_empty() {
        let printer = Printer::new(Some(80));

        let lines = printer.render(
            "program sub",
            None,
            &Positionals::default(),
            &FlagSet::default(),
        );

        assert_eq!(
            lines,
            vec![
                "usage: program sub [--help]",
                "",
                "options:",
                " --help  Show this help message and exit.",
            ]
        );
    }

    #[test]
    fn render() {
        let printer = Printer::new(Some(80));

        let lines = printer.render(
            "program sub",
            Some("Import files into an instance."),
            &positionals(),
            &flags(),
        );

        assert_eq!(
            lines,
            vec![
                "usage: program sub ZONE INSTANCE_TYPE [--help] --file FILE [--recursive] [--count COUNT]",
                "",
                "Import files into an instance.",
                "",
                "positional arguments:",
                " ZONE           [position 0]",
                " INSTANCE_TYPE  The instance type. [position 1]",
                "",
                "options:",
                " --help         Show this help message and exit.",
                " --file FILE    File to import (*.ext) [required]",
                " --recursive",
                " --count COUNT  How many files to count [default: 4]",
            ]
        );
    }

    #[test]
    fn render_narrow() {
        let printer = Printer::new(Some(20));

        let lines = printer.render("program", None, &Positionals::default(), &flags());

        // 1 indent + 13 left + 2 padding, then the minimum middle width.
        assert_contains!(
            lines.join("\n"),
            " --count COUNT  How many files to\n                count [default:\n                4]"
        );
    }

    #[test]
    fn render_declared_help() {
        let printer = Printer::new(Some(80));
        let mut flags = FlagSet::default();
        flags
            .bind(Flag::string("help").default("topic").consume())
            .unwrap();

        let lines = printer.render("program", None, &Positionals::default(), &flags);

        assert_eq!(
            lines,
            vec![
                "usage: program [--help HELP]",
                "",
                "options:",
                " --help HELP  [default: \"topic\"]",
            ]
        );
    }

    #[test]
    fn print_help() {
        let printer = Printer::new(Some(80));
        let interface = InMemoryInterface::default();

        printer.print_help(
            "program",
            None,
            &Positionals::default(),
            &FlagSet::default(),
            &interface,
        );

        let message = interface.consume_message();
        assert_contains!(message, "usage: program [--help]\n");
    }

    #[test]
    fn print_error_context() {
        let printer = Printer::new(Some(80));
        let interface = InMemoryInterface::default();

        printer.print_error_context(
            "program",
            None,
            &Positionals::default(),
            &FlagSet::default(),
            &interface,
        );

        let (message, error) = interface.consume();
        assert_eq!(message, None);
        assert_contains!(error.unwrap(), "usage: program [--help]\n");
    }
}

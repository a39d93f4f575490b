use crate::types::TodoCommand;
use crate::utils::join_words;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;

pub const BIN_NAME: &str = "todo";

fn force_flag(help: &'static str) -> Arg {
    Arg::new("force")
        .long("force")
        .help(help)
        .action(ArgAction::SetTrue)
}

fn list_name(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).help(help).required(true).value_name("LIST")
}

pub fn build_cli() -> Command {
    Command::new(BIN_NAME)
        .about("Simple to-do lists, one sqlite database per list in ~/.todo")
        .arg(
            Arg::new("all")
                .short('a')
                .long("all")
                .help("Show all todo lists")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("create")
                .about("Create a new todo list")
                .arg(list_name("name", "Name of the new list"))
                .arg(force_flag(
                    "Overwrite the existing list if it already exists",
                ))
                .after_help("Examples:\n  todo create mylist\n  todo create mylist --force"),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an existing todo list")
                .arg(list_name("name", "List to delete"))
                .arg(force_flag("Delete without asking for confirmation"))
                .after_help("Examples:\n  todo delete mylist\n  todo delete mylist --force"),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename an existing todo list")
                .arg(list_name("old_name", "Current list name"))
                .arg(
                    Arg::new("new_name")
                        .help("New list name")
                        .required(true)
                        .value_name("NEW_NAME"),
                )
                .after_help("Example:\n  todo rename old_name new_name"),
        )
        .subcommand(
            Command::new("add")
                .about("Add a task to a list")
                .arg(
                    Arg::new("task")
                        .help("Task name")
                        .num_args(0..)
                        .value_name("TASK"),
                )
                .arg(
                    Arg::new("list")
                        .short('l')
                        .long("list")
                        .help("Todo list to add the task to")
                        .num_args(1)
                        .value_name("LIST"),
                )
                .arg(
                    Arg::new("description")
                        .short('d')
                        .long("desc")
                        .help("Add a description to the task")
                        .num_args(1..)
                        .value_name("DESCRIPTION"),
                )
                .after_help(
                    "Examples:\n  todo add buy milk -l groceries -d 2%\n  todo add \"buy eggs\" --list groceries",
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show the tasks of a list")
                .arg(list_name("list", "List to show")),
        )
        .subcommand(
            Command::new("completions")
                .about("Print completion script for <SHELL> to stdout")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .value_name("SHELL"),
                ),
        )
}

pub fn parse_command() -> TodoCommand {
    parse_command_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

pub fn parse_command_from<I, T>(args: I) -> Result<TodoCommand, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli().try_get_matches_from(args)?;
    Ok(command_from_matches(&matches))
}

fn command_from_matches(matches: &ArgMatches) -> TodoCommand {
    match matches.subcommand() {
        Some(("create", sub)) => TodoCommand::Create {
            name: required_string(sub, "name"),
            force: sub.get_flag("force"),
        },
        Some(("delete", sub)) => TodoCommand::Delete {
            name: required_string(sub, "name"),
            force: sub.get_flag("force"),
        },
        Some(("rename", sub)) => TodoCommand::Rename {
            old_name: required_string(sub, "old_name"),
            new_name: required_string(sub, "new_name"),
        },
        Some(("add", sub)) => parse_add_command(sub),
        Some(("show", sub)) => TodoCommand::Show {
            list: required_string(sub, "list"),
        },
        Some(("completions", sub)) => TodoCommand::Completions {
            shell: required_string(sub, "shell"),
        },
        _ if matches.get_flag("all") => TodoCommand::ListAll,
        _ => TodoCommand::Help,
    }
}

fn parse_add_command(matches: &ArgMatches) -> TodoCommand {
    let name = matches
        .get_many::<String>("task")
        .map(join_words)
        .unwrap_or_default();

    let description = matches
        .get_many::<String>("description")
        .map(join_words)
        .filter(|desc| !desc.is_empty());

    TodoCommand::Add {
        name,
        list: matches.get_one::<String>("list").cloned().unwrap_or_default(),
        description,
    }
}

fn required_string(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

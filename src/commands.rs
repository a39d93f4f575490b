use crate::cli::{BIN_NAME, build_cli};
use crate::database::ListStore;
use crate::display::{print_list_names, print_task_added, print_tasks};
use crate::logging::EventSink;
use crate::prompt::Confirm;
use crate::types::{Outcome, TodoCommand, TodoError};
use crate::utils::{validate_list_name, validate_task_name};
use clap_complete::generate;
use clap_complete::shells::{Bash, Elvish, Fish, PowerShell, Zsh};
use colored::*;
use std::io;

/// Everything a command needs from the outside world.
pub struct Context<'a> {
    pub store: &'a ListStore,
    pub events: &'a dyn EventSink,
    pub prompt: &'a mut dyn Confirm,
}

pub fn execute_command(ctx: &mut Context<'_>, command: TodoCommand) -> Outcome {
    match command {
        TodoCommand::Create { name, force } => handle_create(ctx, &name, force),

        TodoCommand::Delete { name, force } => handle_delete(ctx, &name, force),

        TodoCommand::Rename { old_name, new_name } => handle_rename(ctx, &old_name, &new_name),

        TodoCommand::Add {
            name,
            list,
            description,
        } => handle_add(ctx, &list, &name, description.as_deref()),

        TodoCommand::ListAll => handle_list_all(ctx),

        TodoCommand::Show { list } => handle_show(ctx, &list),

        TodoCommand::Completions { shell } => handle_completions(ctx, &shell),

        TodoCommand::Help => handle_help(ctx),
    }
}

fn handle_create(ctx: &mut Context<'_>, name: &str, force: bool) -> Outcome {
    if let Err(e) = validate_list_name(name) {
        return surface_create_failure(ctx, name, e);
    }
    if ctx.store.exists(name) {
        if !force {
            let message = format!("list '{name}' already exists");
            println!("{}", message.bright_yellow());
            println!("{}", "   use --force to overwrite it".bright_yellow());
            ctx.events.warn(&message);
            return Outcome::Aborted;
        }

        let message = format!("removing existing list {name}");
        println!("{message}");
        ctx.events.warn(&message);
        if let Err(e) = ctx.store.delete_list(name) {
            return surface_create_failure(ctx, name, e);
        }
    }

    match ctx.store.create_list(name) {
        Ok(()) => {
            let message = format!("{name} created successfully in {}", ctx.store.dir().display());
            println!("{}", message.bright_green());
            ctx.events.info(&message);
            Outcome::Created
        }
        Err(e) => surface_create_failure(ctx, name, e),
    }
}

fn surface_create_failure(ctx: &Context<'_>, name: &str, err: TodoError) -> Outcome {
    println!("{} {err}", format!("error creating list {name}:").bright_red());
    record_failure(
        ctx.events,
        &format!("error creating list {name}: {}", err.detail()),
        &err,
    );
    Outcome::Aborted
}

fn handle_delete(ctx: &mut Context<'_>, name: &str, force: bool) -> Outcome {
    if let Err(e) = validate_list_name(name) {
        return surface(ctx, e);
    }
    if !ctx.store.exists(name) {
        return surface(
            ctx,
            TodoError::NotFound(format!("{name} todo list doesn't exist")),
        );
    }

    if !force {
        let question = format!("Are you sure you want to delete {name} todo list?");
        match ctx.prompt.confirm(&question) {
            Ok(true) => {}
            Ok(false) => {
                let declined = TodoError::Declined(format!("deletion cancelled for '{name}'"));
                println!("{declined}");
                ctx.events.info(&declined.detail());
                return Outcome::Declined;
            }
            Err(e) => return surface(ctx, e),
        }
    }

    match ctx.store.delete_list(name) {
        Ok(()) => {
            let message = format!("{name} todo list deleted successfully");
            println!("{}", message.bright_green());
            ctx.events.info(&message);
            Outcome::Deleted
        }
        Err(e) => surface(ctx, e),
    }
}

fn handle_rename(ctx: &mut Context<'_>, old_name: &str, new_name: &str) -> Outcome {
    match ctx.store.rename_list(old_name, new_name) {
        Ok(_) => {
            let message = format!("{old_name} renamed to {new_name}");
            println!("{}", message.bright_green());
            ctx.events.info(&message);
            Outcome::Renamed
        }
        Err(e) => surface(ctx, e),
    }
}

fn handle_add(
    ctx: &mut Context<'_>,
    list: &str,
    name: &str,
    description: Option<&str>,
) -> Outcome {
    if let Err(e) = validate_list_name(list).and_then(|_| validate_task_name(name)) {
        return surface(ctx, e);
    }
    if !ctx.store.exists(list) {
        return surface(ctx, TodoError::NotFound("no list found".to_string()));
    }

    match ctx.store.add_task(list, name, description) {
        Ok(id) => {
            print_task_added(list, id, name);
            ctx.events.info(&format!("task {id} '{name}' added to {list}"));
            Outcome::Added
        }
        Err(e) => surface(ctx, e),
    }
}

fn handle_list_all(ctx: &mut Context<'_>) -> Outcome {
    match ctx.store.list_all() {
        Ok(names) => {
            print_list_names(&names);
            Outcome::Listed
        }
        Err(e) => surface(ctx, e),
    }
}

fn handle_show(ctx: &mut Context<'_>, list: &str) -> Outcome {
    match ctx.store.tasks(list) {
        Ok(tasks) => {
            print_tasks(list, &tasks);
            Outcome::Shown
        }
        Err(e) => surface(ctx, e),
    }
}

fn handle_completions(ctx: &mut Context<'_>, shell: &str) -> Outcome {
    let mut cmd = build_cli();
    let mut out = io::stdout();

    match shell {
        "bash" => generate(Bash, &mut cmd, BIN_NAME, &mut out),
        "zsh" => generate(Zsh, &mut cmd, BIN_NAME, &mut out),
        "fish" => generate(Fish, &mut cmd, BIN_NAME, &mut out),
        "powershell" => generate(PowerShell, &mut cmd, BIN_NAME, &mut out),
        "elvish" => generate(Elvish, &mut cmd, BIN_NAME, &mut out),
        other => {
            return surface(
                ctx,
                TodoError::Validation(format!("unsupported shell '{other}'")),
            );
        }
    }
    Outcome::Completions
}

fn handle_help(ctx: &mut Context<'_>) -> Outcome {
    if let Err(e) = build_cli().print_help() {
        return surface(ctx, TodoError::Io(e));
    }
    println!();
    Outcome::HelpShown
}

/// Prints and logs a failure that does not abort the process.
fn surface(ctx: &Context<'_>, err: TodoError) -> Outcome {
    println!("{err}");
    record_failure(ctx.events, &err.detail(), &err);
    Outcome::Rejected
}

fn record_failure(events: &dyn EventSink, message: &str, err: &TodoError) {
    if err.is_recoverable() {
        events.warn(message);
    } else {
        events.error(message);
    }
}

use std::{io, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use itertools::Itertools;

use crate::{
    domain::{ActiveCategory, Category, NoteId, filter_notes},
    storage::{self, KeyValueStore},
    store::NoteStore,
};

#[derive(Parser, Debug)]
#[command(name = "notebox")]
#[command(about = "Categorized notes in the terminal", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Directory that holds notesData.json")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Run against a copy in memory; nothing is saved")]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "List notes, optionally filtered")]
    List {
        #[arg(long, short, value_enum, ignore_case = true, help = "Only this category")]
        category: Option<Category>,

        #[arg(long, short, help = "Case-insensitive text in title or description")]
        search: Option<String>,

        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },

    #[command(about = "Show one note")]
    Show {
        #[arg(help = "Note ID")]
        id: String,
    },

    #[command(about = "Add a note")]
    Add {
        #[arg(long, short, help = "Note title")]
        title: String,

        #[arg(long, short, help = "Note description")]
        description: String,

        #[arg(
            long,
            short,
            value_enum,
            ignore_case = true,
            default_value = "Work",
            help = "Category"
        )]
        category: Category,
    },

    #[command(about = "Edit a note; omitted fields keep their value")]
    Edit {
        #[arg(help = "Note ID")]
        id: String,

        #[arg(long, short, help = "New title")]
        title: Option<String>,

        #[arg(long, short, help = "New description")]
        description: Option<String>,

        #[arg(long, short, value_enum, ignore_case = true, help = "New category")]
        category: Option<Category>,
    },

    #[command(about = "Delete a note")]
    Delete {
        #[arg(help = "Note ID")]
        id: String,
    },

    #[command(about = "Export all notes as JSON")]
    Export {
        #[arg(long, short, help = "Output path")]
        out: Option<PathBuf>,
    },

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

pub fn list_notes<S: KeyValueStore>(
    store: &NoteStore<S>,
    category: Option<Category>,
    search: Option<&str>,
    json: bool,
) -> Result<String, String> {
    let active = category
        .map(ActiveCategory::Only)
        .unwrap_or(ActiveCategory::All);
    let visible = filter_notes(store.notes(), active, search.unwrap_or(""));

    if json {
        return serde_json::to_string_pretty(&visible).map_err(|e| e.to_string());
    }

    if visible.is_empty() {
        return Ok(format!("No notes in {}", active.label()));
    }

    let id_width = visible
        .iter()
        .map(|note| note.id.to_string().chars().count())
        .max()
        .unwrap_or(2)
        .max(2);

    let header = format!("{:id_width$}  {:10} {}", "ID", "CATEGORY", "TITLE");
    let rows = visible
        .iter()
        .map(|note| {
            format!(
                "{:id_width$}  {:10} {}",
                note.id.to_string(),
                note.category.label(),
                note.title
            )
        })
        .join("\n");

    Ok(format!("{}\n{}", header, rows))
}

/// Digits resolve to a numeric id first, then to a text id with the same
/// characters when no numeric match exists.
pub fn resolve_id<S: KeyValueStore>(store: &NoteStore<S>, raw: &str) -> NoteId {
    let parsed = NoteId::parse(raw);
    if parsed.as_number().is_some() && store.get(&parsed).is_none() {
        let text = NoteId::Text(raw.trim().to_string());
        if store.get(&text).is_some() {
            return text;
        }
    }
    parsed
}

pub fn show_note<S: KeyValueStore>(store: &NoteStore<S>, id: &NoteId) -> Result<String, String> {
    let note = store
        .get(id)
        .ok_or_else(|| format!("Note '{}' not found", id))?;

    let mut out = format!("{}\n[{}] id {}", note.title, note.category, note.id);
    if let Some(created_at) = note.created_at {
        out.push_str(&format!(" · created {}", created_at.to_rfc3339()));
    }
    out.push_str("\n\n");
    out.push_str(&note.description);
    Ok(out)
}

pub fn add_note<S: KeyValueStore>(
    store: &mut NoteStore<S>,
    title: &str,
    description: &str,
    category: Category,
) -> Result<NoteId, String> {
    store
        .create(title, description, category)
        .map_err(|e| e.to_string())
}

pub fn edit_note<S: KeyValueStore>(
    store: &mut NoteStore<S>,
    id: &NoteId,
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
) -> Result<(), String> {
    let current = store
        .get(id)
        .cloned()
        .ok_or_else(|| format!("Note '{}' not found", id))?;

    store
        .update(
            id,
            title.as_deref().unwrap_or(&current.title),
            description.as_deref().unwrap_or(&current.description),
            category.unwrap_or(current.category),
        )
        .map_err(|e| e.to_string())
}

pub fn export_notes<S: KeyValueStore>(
    store: &NoteStore<S>,
    out_path: Option<PathBuf>,
) -> Result<(), String> {
    let json = storage::encode_notes(store.notes()).map_err(|e| e.to_string())?;
    if let Some(path) = out_path {
        storage::write_text_file(&path, &json)?;
        println!("Exported {} notes to {}", store.len(), path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}

pub fn print_completions(shell: &str) -> Result<(), String> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => {
            return Err(format!(
                "Unsupported shell: {}. Use bash, zsh, or fish.",
                shell
            ));
        }
    };
    clap_complete::generate(shell, &mut Cli::command(), "notebox", &mut io::stdout());
    Ok(())
}

pub fn run_command<S: KeyValueStore>(
    command: Command,
    store: &mut NoteStore<S>,
) -> Result<(), String> {
    match command {
        Command::List {
            category,
            search,
            json,
        } => println!("{}", list_notes(store, category, search.as_deref(), json)?),
        Command::Show { id } => {
            let id = resolve_id(store, &id);
            println!("{}", show_note(store, &id)?);
        }
        Command::Add {
            title,
            description,
            category,
        } => {
            let id = add_note(store, &title, &description, category)?;
            println!("Added note {}", id);
        }
        Command::Edit {
            id,
            title,
            description,
            category,
        } => {
            let id = resolve_id(store, &id);
            edit_note(store, &id, title, description, category)?;
            println!("Updated note {}", id);
        }
        Command::Delete { id } => {
            let id = resolve_id(store, &id);
            if store.delete(&id) {
                println!("Deleted note {}", id);
            } else {
                println!("No note {}; nothing deleted", id);
            }
        }
        Command::Export { out } => export_notes(store, out)?,
        Command::Completions { shell } => print_completions(&shell)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Note, ValidationError},
        storage::MemoryStore,
    };

    fn store() -> NoteStore<MemoryStore> {
        let mut store = NoteStore::with_notes(Vec::new(), MemoryStore::new());
        store.create("Buy milk", "2%", Category::Work).unwrap();
        store.create("Trip", "pack milk powder", Category::Personal).unwrap();
        store.create("Robot", "garden bot", Category::Ideas).unwrap();
        store
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "notebox",
            "--data-dir",
            "/tmp/notes",
            "add",
            "-t",
            "Title",
            "-d",
            "Body",
            "-c",
            "ideas",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/notes")));
        match cli.command {
            Some(Command::Add { category, .. }) => {
                assert_eq!(category, Category::Ideas)
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let bare = Cli::try_parse_from(["notebox"]).unwrap();
        assert!(bare.command.is_none());
        assert!(!bare.dry_run);

        let dry = Cli::try_parse_from(["notebox", "delete", "3", "--dry-run"]).unwrap();
        assert!(dry.dry_run);
    }

    #[test]
    fn test_category_values_come_from_domain() {
        let cmd = Cli::command();
        let add = cmd.find_subcommand("add").unwrap();
        let arg = add
            .get_arguments()
            .find(|a| a.get_id() == "category")
            .unwrap();
        let values: Vec<String> = arg
            .get_possible_values()
            .iter()
            .map(|v| v.get_name().to_string())
            .collect();
        let expected: Vec<String> = Category::ALL.iter().map(|c| c.label().to_string()).collect();
        assert_eq!(values, expected);

        let cli = Cli::try_parse_from(["notebox", "list", "-c", "PERSONAL"]).unwrap();
        match cli.command {
            Some(Command::List { category, .. }) => assert_eq!(category, Some(Category::Personal)),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["notebox", "add", "-t", "T", "-d", "D"]).unwrap();
        match cli.command {
            Some(Command::Add { category, .. }) => assert_eq!(category, Category::Work),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_digit_only_text_id_is_reachable() {
        let notes = vec![Note {
            id: NoteId::Text("5".to_string()),
            title: "Imported".to_string(),
            description: "from elsewhere".to_string(),
            category: Category::Ideas,
            created_at: None,
        }];
        let mut store = NoteStore::with_notes(notes, MemoryStore::new());

        assert_eq!(resolve_id(&store, "5"), NoteId::Text("5".to_string()));
        assert!(show_note(&store, &resolve_id(&store, " 5 ")).is_ok());
        assert_eq!(resolve_id(&store, "6"), NoteId::Number(6));

        run_command(Command::Delete { id: "5".to_string() }, &mut store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_filters_by_category_and_search() {
        let store = store();
        let out = list_notes(&store, None, Some("MILK"), false).unwrap();
        assert!(out.contains("Buy milk"));
        assert!(out.contains("Trip"));
        assert!(!out.contains("Robot"));

        let out = list_notes(&store, Some(Category::Work), Some("milk"), false).unwrap();
        assert!(out.contains("Buy milk"));
        assert!(!out.contains("Trip"));

        let out = list_notes(&store, Some(Category::Ideas), Some("milk"), false).unwrap();
        assert_eq!(out, "No notes in Ideas");
    }

    #[test]
    fn test_list_json_is_note_schema() {
        let store = store();
        let out = list_notes(&store, Some(Category::Personal), None, true).unwrap();
        let notes = storage::decode_notes(&out).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Trip");
    }

    #[test]
    fn test_edit_keeps_omitted_fields() {
        let mut store = store();
        let id = store.notes()[0].id.clone();
        edit_note(&mut store, &id, None, Some("whole".to_string()), None).unwrap();

        let note = store.get(&id).unwrap();
        assert_eq!(note.title, "Buy milk");
        assert_eq!(note.description, "whole");
        assert_eq!(note.category, Category::Work);
    }

    #[test]
    fn test_add_duplicate_reports_message() {
        let mut store = store();
        let err = add_note(&mut store, "buy MILK ", "again", Category::Work).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateTitle.to_string());
    }

    #[test]
    fn test_show_unknown_note() {
        let store = store();
        assert!(show_note(&store, &NoteId::parse("12")).is_err());
    }

    #[test]
    fn test_delete_command_is_idempotent() {
        let mut store = store();
        let id = store.notes()[2].id.to_string();
        run_command(Command::Delete { id: id.clone() }, &mut store).unwrap();
        run_command(Command::Delete { id }, &mut store).unwrap();
        assert_eq!(store.len(), 2);
    }
}

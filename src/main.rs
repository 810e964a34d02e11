use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use docx_redline::{CommentDraft, DocxEditor, Error};

#[derive(Parser)]
#[command(name = "docx-redline", version, about = "Review edits for DOCX files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the document's paragraphs with their indexes
    Paragraphs {
        file: PathBuf,
        /// Prefix autonumbered paragraphs with their rendered labels
        #[arg(long)]
        numbered: bool,
    },
    /// Insert text at a character offset
    Insert {
        file: PathBuf,
        #[arg(long)]
        paragraph: usize,
        #[arg(long)]
        offset: usize,
        text: String,
        /// Record the edit as a tracked insertion
        #[arg(long)]
        tracked: bool,
        /// Write the result here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a character range
    Delete {
        file: PathBuf,
        #[arg(long)]
        paragraph: usize,
        #[arg(long)]
        start: usize,
        #[arg(long)]
        end: usize,
        /// Keep the struck text as a tracked deletion
        #[arg(long)]
        tracked: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Anchor a review comment to a character range
    Comment {
        file: PathBuf,
        #[arg(long)]
        paragraph: usize,
        #[arg(long)]
        start: usize,
        #[arg(long)]
        end: usize,
        text: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Paragraphs { file, numbered } => {
            let mut editor = DocxEditor::open(&file)?;
            let paragraphs = if numbered {
                editor.numbered_paragraphs()?
            } else {
                editor.paragraphs()?
            };
            for (i, text) in paragraphs.iter().enumerate() {
                println!("{i:4}  {text}");
            }
            Ok(())
        }
        Command::Insert {
            file,
            paragraph,
            offset,
            text,
            tracked,
            output,
        } => {
            let mut editor = DocxEditor::open(&file)?;
            editor.insert(paragraph, offset, &text, tracked)?;
            write_out(&editor, output)
        }
        Command::Delete {
            file,
            paragraph,
            start,
            end,
            tracked,
            output,
        } => {
            let mut editor = DocxEditor::open(&file)?;
            editor.delete(paragraph, start, end, tracked)?;
            write_out(&editor, output)
        }
        Command::Comment {
            file,
            paragraph,
            start,
            end,
            text,
            author,
            output,
        } => {
            let mut editor = DocxEditor::open(&file)?;
            let mut draft = CommentDraft::new(text);
            draft.author = author;
            let id = editor.add_comment(paragraph, start, end, draft)?;
            println!("comment {id}");
            write_out(&editor, output)
        }
    }
}

fn write_out(editor: &DocxEditor, output: Option<PathBuf>) -> Result<(), Error> {
    match output {
        Some(path) => editor.save_as(path),
        None => editor.save(),
    }
}

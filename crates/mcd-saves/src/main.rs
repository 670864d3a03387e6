use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use argh::FromArgs;
use colored::Colorize;
use mcd_reader::{list_saves, CardReader};
use mcd_saves::{card_line, entry_line, find_cards, raw_line, saves_json};

/// List the saves on a PS2 memory card image, or the card images in a
/// folder.
#[derive(FromArgs)]
struct Args {
    /// card image (.ps2) to list, or a folder to search for card images
    #[argh(positional)]
    path: PathBuf,

    /// print one name|size|is_directory line per save
    #[argh(switch)]
    raw: bool,

    /// print the saves as a JSON array
    #[argh(switch)]
    json: bool,

    /// also print the card's format-identifier header
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn main() {
    let args: Args = argh::from_env();

    if args.raw && args.json {
        eprintln!("--raw and --json are mutually exclusive");
        process::exit(2);
    }

    if args.path.is_dir() {
        list_card_folder(&args);
    } else {
        list_card_saves(&args);
    }
}

fn list_card_folder(args: &Args) {
    let cards = find_cards(&args.path);
    if cards.is_empty() {
        eprintln!("{}", "No memory cards found".dimmed());
        return;
    }

    for card in &cards {
        if args.raw {
            println!("{}", card.path.display());
        } else {
            println!("{}", card_line(card));
        }
    }
}

fn list_card_saves(args: &Args) {
    if args.verbose {
        print_card_header(&args.path);
    }

    let saves = list_saves(&args.path);

    if args.json {
        println!("{}", saves_json(&saves));
        return;
    }
    if args.raw {
        for entry in &saves {
            println!("{}", raw_line(entry));
        }
        return;
    }

    if saves.is_empty() {
        eprintln!("{}", "No saves found".dimmed());
        return;
    }
    for entry in &saves {
        if entry.is_directory {
            println!("{}", entry_line(entry).green());
        } else {
            println!("{}", entry_line(entry));
        }
    }
}

fn print_card_header(path: &Path) {
    let superblock = File::open(path)
        .map_err(mcd_reader::Error::from)
        .and_then(|file| CardReader::new(file).superblock());
    match superblock {
        Ok(superblock) => {
            let format_id = superblock.format_id();
            if !format_id.is_empty() {
                eprintln!("{}", format_id.dimmed());
            }
        }
        Err(err) => eprintln!("{} {err}", path.display().to_string().dimmed()),
    }
}

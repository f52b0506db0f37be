use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use btrix::btree::BTreeIndex;
use btrix::cli::{Cli, Command};
use btrix::csv_io;

//-------------------------------------------------------------------------

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Create { index } => {
            BTreeIndex::create(&index)?;
            info!(index = %index.display(), "created index");
            println!("Created index file '{}'.", index.display());
        }

        Command::Insert { index, key, value } => {
            let mut tree = BTreeIndex::open(&index)?;
            tree.insert(key, value)?;
            println!(
                "Inserted key={}, value={} into '{}'.",
                key,
                value,
                index.display()
            );
        }

        Command::Search { index, key } => {
            let mut tree = BTreeIndex::open(&index)?;
            match tree.search(key)? {
                Some(value) => println!("Found key={}, value={}", key, value),
                None => println!("Key {} not found in '{}'.", key, index.display()),
            }
        }

        Command::Load { index, csv } => {
            let mut tree = BTreeIndex::open(&index)?;
            let pairs = csv_io::load_pairs(&csv)?;
            let count = pairs.len();
            for (key, value) in pairs {
                tree.insert(key, value)?;
            }
            println!("Loaded {} entries from '{}'.", count, csv.display());
        }

        Command::Print { index } => {
            let mut tree = BTreeIndex::open(&index)?;
            for (key, value) in tree.inorder()? {
                println!("{} {}", key, value);
            }
        }

        Command::Extract { index, csv } => {
            let mut tree = BTreeIndex::open(&index)?;
            let pairs = tree.inorder()?;
            let count = pairs.len();
            csv_io::write_pairs(&csv, &pairs)?;
            println!("Extracted {} entries to '{}'.", count, csv.display());
        }
    }

    Ok(())
}

//-------------------------------------------------------------------------

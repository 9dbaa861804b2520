mod api;
mod attribution;
mod channel;
mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod models;
mod period;
mod providers;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands, ReportCommands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Add {
            amount,
            channel,
            date,
            site,
            currency,
            campaign,
            description,
        } => cli::costs::add(amount, &channel, &date, site, currency, campaign, description),
        Commands::Update {
            id,
            site,
            channel,
            date,
            amount,
            currency,
            campaign,
            description,
        } => cli::costs::update(id, site, channel, date, amount, currency, campaign, description),
        Commands::Delete { id, site } => cli::costs::delete(id, site),
        Commands::Costs {
            site,
            limit,
            offset,
            order_by,
            order_dir,
        } => cli::costs::list(site, limit, offset, &order_by, &order_dir),
        Commands::Import {
            file,
            site,
            delete_existing,
        } => cli::import::run(&file, site, delete_existing),
        Commands::Channels => cli::channels::run(),
        Commands::Report { command } => match command {
            ReportCommands::ByChannel {
                site,
                period,
                date,
                stats,
                no_roi,
            } => cli::report::by_channel(site, &period, date, stats, no_roi),
            ReportCommands::Costs {
                site,
                period,
                date,
                channel,
            } => cli::report::costs(site, &period, date, channel),
            ReportCommands::Summary {
                site,
                period,
                date,
                stats,
            } => cli::report::summary(site, &period, date, stats),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

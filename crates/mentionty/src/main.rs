use std::io;

use clap::Parser;
use mentionty::app::App;
use mentionty::cli::Cli;
use mentionty::infra::directory::load_directory;
use mentionty::infra::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_file_path(), cli.log_level.into())
        .map_err(|error| io::Error::other(format!("Error: {error}")))?;

    let directory = load_directory(cli.user_source().as_ref())
        .map_err(|error| io::Error::other(format!("Error: {error}")))?;
    let mut app = App::new(directory);

    mentionty::runtime::run(&mut app).await
}

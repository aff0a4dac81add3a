use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Validate(args) => commands::validate::handle(&args, ctx, flags),
        Commands::Upload(args) => commands::upload::handle(&args, ctx, flags).await,
        Commands::Hash(args) => commands::hash::handle(&args, ctx, flags).await,
        Commands::Reset(args) => commands::reset::handle(&args, ctx, flags).await,
        Commands::Status => commands::status::handle(ctx, flags).await,
    }
}

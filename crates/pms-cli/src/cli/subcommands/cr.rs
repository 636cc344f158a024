use clap::{Args, Subcommand};

/// Change request commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CrCommands {
    /// Create a draft change request.
    Create {
        #[arg(long)]
        title: String,
        /// Category: components, work_orders, running_hours, spares.
        #[arg(long)]
        category: String,
        #[arg(long)]
        reason: Option<String>,
        /// Vessel id (defaults to `general.vessel_id`).
        #[arg(long)]
        vessel: Option<String>,
        /// JSON file holding the target record to snapshot.
        #[arg(long)]
        target: Option<String>,
    },
    /// List change requests.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        vessel: Option<String>,
        #[arg(long)]
        target_type: Option<String>,
        #[arg(long)]
        target_id: Option<String>,
        /// Only requests raised by the acting user.
        #[arg(long)]
        mine: bool,
        /// Substring search over title and reason.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        /// Query the configured server instead of the local store.
        #[arg(long)]
        remote: bool,
    },
    /// Get a change request with comments and attachments.
    Get {
        id: String,
        #[arg(long)]
        remote: bool,
    },
    /// Update the title or reason of a draft.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_reason")]
        reason: Option<String>,
        #[arg(long)]
        clear_reason: bool,
    },
    /// Edit the proposed field changes and move preview.
    Propose(ProposeArgs),
    /// Submit a draft for review.
    Submit { id: String },
    /// Approve a submitted request and print the payload to apply.
    Approve {
        id: String,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        remote: bool,
    },
    /// Reject a submitted request.
    Reject {
        id: String,
        #[arg(long)]
        comment: String,
        #[arg(long)]
        remote: bool,
    },
    /// Return a submitted request to the requester for revision.
    Return {
        id: String,
        #[arg(long)]
        comment: String,
    },
    /// Delete a draft.
    Delete {
        id: String,
        #[arg(long)]
        remote: bool,
    },
    /// Add a comment.
    Comment {
        id: String,
        #[arg(long)]
        message: String,
    },
    /// Attach a file reference.
    Attach {
        id: String,
        #[arg(long)]
        filename: String,
        #[arg(long)]
        url: String,
    },
    /// Send a local request to the configured server.
    Push {
        id: String,
        /// Update this server-side request instead of creating a new one.
        #[arg(long)]
        remote_id: Option<String>,
    },
}

/// Arguments for `pms cr propose`.
#[derive(Clone, Debug, Args)]
pub struct ProposeArgs {
    pub id: String,
    /// JSON file with a new target record. Discards the current proposal.
    #[arg(long)]
    pub target: Option<String>,
    /// Propose `path=value`, e.g. `maker=Wartsila`. Repeatable.
    #[arg(long)]
    pub set: Vec<String>,
    /// Stop proposing a change to `path`. Repeatable.
    #[arg(long)]
    pub unset: Vec<String>,
    /// Discard all proposed changes and the move preview.
    #[arg(long)]
    pub clear: bool,
    /// JSON file with the destination parent node for a component move.
    #[arg(long)]
    pub move_to: Option<String>,
    #[arg(long, conflicts_with = "move_to")]
    pub clear_move: bool,
}

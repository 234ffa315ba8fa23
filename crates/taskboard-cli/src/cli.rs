use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "A multi-tenant kanban task board", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board data file (or set TASKBOARD_FILE env var)
    #[arg(short, long, value_name = "FILE", env = "TASKBOARD_FILE", global = true)]
    pub file: Option<String>,

    /// Organization whose board to work on
    #[arg(long, env = "TASKBOARD_ORG", default_value = "default", global = true)]
    pub org: String,

    /// Acting user id, used to attribute notifications
    #[arg(long, env = "TASKBOARD_USER", global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// Column operations
    Column(ColumnCommand),
    /// Task operations
    Task(TaskCommand),
    /// Team member operations
    Member(MemberCommand),
    /// Notification producers
    Notify(NotifyCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Show every column with its tasks
    Show,
    /// Print the board again whenever the data file changes
    Watch {
        /// Stop after this many changes
        #[arg(long)]
        limit: Option<usize>,
    },
}

// Column commands
#[derive(Args)]
pub struct ColumnCommand {
    #[command(subcommand)]
    pub action: ColumnAction,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// List columns in display order
    List,
    /// Append a new column
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename a column
    Rename {
        /// Column id or title
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
    },
    /// Delete a column
    Delete {
        /// Column id or title
        #[arg(long)]
        id: String,
        /// Column that receives the deleted column's tasks
        #[arg(long)]
        move_tasks_to: Option<String>,
    },
    /// Drag a column onto another column's slot
    Move {
        /// Column id or title
        #[arg(long)]
        id: String,
        /// Column whose slot it takes
        #[arg(long)]
        to: String,
    },
}

// Task commands
#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks
    List {
        /// Only tasks in this column (id or title)
        #[arg(long)]
        column: Option<String>,
    },
    /// Create a task at the end of a column
    Create(TaskCreateArgs),
    /// Edit a task
    Update(TaskUpdateArgs),
    /// Toggle a task's completion
    Complete {
        #[arg(long)]
        id: String,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Drag a task into a column or onto another task
    Move {
        #[arg(long)]
        id: String,
        /// Drop into the end of this column (id or title)
        #[arg(long, conflicts_with = "onto", required_unless_present = "onto")]
        to: Option<String>,
        /// Drop onto this task, taking its slot
        #[arg(long)]
        onto: Option<String>,
    },
}

#[derive(Args)]
pub struct TaskCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// Column id or title
    #[arg(long)]
    pub column: Option<String>,
    /// Legacy status, used to pick a column when none is given
    #[arg(long)]
    pub status: Option<String>,
    /// Member ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub assignees: Vec<String>,
    #[arg(long)]
    pub due_date: Option<String>,
}

#[derive(Args)]
pub struct TaskUpdateArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long)]
    pub priority: Option<String>,
    /// Column id or title
    #[arg(long)]
    pub column: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Replace the assignees (member ids, comma separated)
    #[arg(long, value_delimiter = ',')]
    pub assignees: Option<Vec<String>>,
    #[arg(long, conflicts_with = "clear_due_date")]
    pub due_date: Option<String>,
    #[arg(long)]
    pub clear_due_date: bool,
}

// Member commands
#[derive(Args)]
pub struct MemberCommand {
    #[command(subcommand)]
    pub action: MemberAction,
}

#[derive(Subcommand)]
pub enum MemberAction {
    /// List the organization's team members
    List,
    /// Add a team member
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        /// Account id of the member, if they can sign in
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
}

// Notification commands
#[derive(Args)]
pub struct NotifyCommand {
    #[command(subcommand)]
    pub action: NotifyAction,
}

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Notify assignees of open tasks that are due soon
    DueSoon,
}

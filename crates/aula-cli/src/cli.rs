//! Clap definitions for the `aula` binary.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "aula",
    version,
    about = "Smart-classroom facility dashboards (admin + staff)",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides config).
    #[arg(long, global = true, env = "AULA_BACKEND")]
    pub backend: Option<String>,

    /// Accept self-signed TLS certificates.
    #[arg(short = 'k', long, global = true, env = "AULA_INSECURE")]
    pub insecure: bool,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long, global = true, env = "AULA_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Assume "yes" for confirmation prompts.
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Suppress non-essential output.
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and persist the session.
    Login(LoginArgs),

    /// Sign out and clear the persisted session.
    Logout,

    /// Show the current session identity.
    Whoami,

    /// Admin dashboard: classrooms, devices, users, power control.
    Admin(AdminArgs),

    /// Staff portal: dashboard, bookings, contact form.
    Staff(StaffArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Sign in to the admin dashboard (requires the admin role).
    #[arg(long)]
    pub admin: bool,

    /// Username (prompted if omitted).
    #[arg(short, long)]
    pub username: Option<String>,
}

// ── Admin ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Facility overview: counts plus per-classroom status.
    Dashboard {
        /// Keep refreshing every 15s until interrupted.
        #[arg(long)]
        watch: bool,
    },

    /// Classroom management.
    Classrooms(ClassroomsArgs),

    /// ESP device management.
    Devices(DevicesArgs),

    /// User account management.
    Users(UsersArgs),

    /// Switch a classroom's power on or off.
    Power {
        /// Classroom id.
        classroom_id: i64,
        /// Desired state.
        state: PowerState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerState {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct ClassroomsArgs {
    #[command(subcommand)]
    pub command: ClassroomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClassroomsCommand {
    /// List classrooms with their status.
    List,
    /// Create a classroom.
    Create {
        name: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        capacity: Option<u32>,
        /// Link an ESP device by its device id.
        #[arg(long)]
        device: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List registered devices.
    List,
    /// List devices with connectivity and linked-classroom info.
    Status {
        /// Keep refreshing every 15s until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Register a new ESP device.
    Register {
        /// Device id, e.g. CLASSROOM_001.
        device_id: String,
        /// Human-readable name.
        name: String,
        #[arg(long)]
        mac: Option<String>,
        /// API key the device will present; generated if omitted.
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List user accounts.
    List,
    /// Create a user account (password is prompted).
    Create {
        username: String,
        #[arg(long)]
        email: Option<String>,
        /// Role: admin or staff (backend default: staff).
        #[arg(long)]
        role: Option<String>,
    },
    /// Delete a user account by id.
    Delete { id: i64 },
}

// ── Staff ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StaffArgs {
    #[command(subcommand)]
    pub command: StaffCommand,
}

#[derive(Debug, Subcommand)]
pub enum StaffCommand {
    /// Classroom availability overview.
    Dashboard {
        /// Keep refreshing every 30s until interrupted.
        #[arg(long)]
        watch: bool,
    },

    /// List your bookings.
    Bookings,

    /// Book a classroom.
    Book {
        /// Classroom id to book.
        #[arg(long)]
        classroom: i64,
        /// Start time, e.g. 2026-03-02T09:00.
        #[arg(long)]
        start: String,
        /// End time, e.g. 2026-03-02T10:30.
        #[arg(long)]
        end: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Send a message to facility support (no login required).
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        /// Message category: query, bug_report, or feedback.
        #[arg(long, default_value = "query")]
        message_type: String,
    },
}

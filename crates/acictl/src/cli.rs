//! Clap derive structures for the `acictl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use aci_core::{ContractScope, QosClass};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// acictl -- declarative CLI for Cisco ACI fabric management
#[derive(Debug, Parser)]
#[command(
    name = "acictl",
    version,
    about = "Manage Cisco ACI fabrics from the command line",
    long_about = "A CLI for administering Cisco ACI fabric controllers (APIC).\n\n\
        Every apply is declarative and idempotent: the controller is read\n\
        first, only the differing attributes trigger a commit, and --check\n\
        previews the exact change document without writing anything.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "ACI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "ACI_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Username for APIC authentication (overrides profile)
    #[arg(long, short = 'u', env = "ACI_USERNAME", global = true)]
    pub username: Option<String>,

    /// Dry run: report the change document without committing
    #[arg(long, global = true)]
    pub check: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ACI_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ACI_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "ACI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage tenants
    #[command(alias = "tn")]
    Tenant(TenantArgs),

    /// Manage VRF contexts (private networks)
    Vrf(VrfArgs),

    /// Manage bridge domains
    #[command(alias = "bd")]
    BridgeDomain(BridgeDomainArgs),

    /// Manage contracts
    #[command(alias = "brc")]
    Contract(ContractArgs),

    /// Manage contract subjects
    #[command(alias = "subj")]
    Subject(SubjectArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TENANT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TenantArgs {
    #[command(subcommand)]
    pub command: TenantCommand,
}

#[derive(Debug, Subcommand)]
pub enum TenantCommand {
    /// Ensure the tenant exists with the given attributes
    Apply {
        /// Tenant name
        name: String,

        /// Tenant description
        #[arg(long)]
        descr: Option<String>,
    },

    /// Delete the tenant and everything under it
    #[command(alias = "rm")]
    Remove {
        /// Tenant name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VRF (fvCtx)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VrfArgs {
    #[command(subcommand)]
    pub command: VrfCommand,
}

#[derive(Debug, Subcommand)]
pub enum VrfCommand {
    /// Ensure the VRF context exists with the given attributes
    Apply {
        /// VRF context name
        name: String,

        /// Owning tenant (must already exist)
        #[arg(long, short = 't', required = true)]
        tenant: String,

        /// Context description
        #[arg(long)]
        descr: Option<String>,
    },

    /// Delete the VRF context
    #[command(alias = "rm")]
    Remove {
        /// VRF context name
        name: String,

        /// Owning tenant
        #[arg(long, short = 't', required = true)]
        tenant: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BRIDGE DOMAIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BridgeDomainArgs {
    #[command(subcommand)]
    pub command: BridgeDomainCommand,
}

#[derive(Debug, Subcommand)]
pub enum BridgeDomainCommand {
    /// Ensure the bridge domain exists with the given attributes
    Apply {
        /// Bridge domain name
        name: String,

        /// Owning tenant (must already exist)
        #[arg(long, short = 't', required = true)]
        tenant: String,

        /// VRF context to bind (must already exist in the tenant)
        #[arg(long)]
        vrf: Option<String>,

        /// Gateway subnet in address/prefix form (e.g., 10.1.100.1/24)
        #[arg(long)]
        subnet: Option<String>,

        /// Bridge domain description
        #[arg(long)]
        descr: Option<String>,
    },

    /// Delete the bridge domain
    #[command(alias = "rm")]
    Remove {
        /// Bridge domain name
        name: String,

        /// Owning tenant
        #[arg(long, short = 't', required = true)]
        tenant: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTRACT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ContractArgs {
    #[command(subcommand)]
    pub command: ContractCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContractCommand {
    /// Ensure the contract exists with the given attributes
    Apply {
        /// Contract name
        name: String,

        /// Owning tenant (must already exist)
        #[arg(long, short = 't', required = true)]
        tenant: String,

        /// Contract enforcement scope
        #[arg(long, value_enum)]
        scope: Option<ScopeArg>,

        /// QoS priority class
        #[arg(long, value_enum)]
        prio: Option<QosArg>,

        /// Contract description
        #[arg(long)]
        descr: Option<String>,
    },

    /// Delete the contract
    #[command(alias = "rm")]
    Remove {
        /// Contract name
        name: String,

        /// Owning tenant
        #[arg(long, short = 't', required = true)]
        tenant: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    /// Enforce within one application profile
    ApplicationProfile,
    /// Enforce within one VRF context
    Context,
    /// Enforce fabric-wide
    Global,
    /// Enforce within the tenant
    Tenant,
}

impl From<ScopeArg> for ContractScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::ApplicationProfile => ContractScope::ApplicationProfile,
            ScopeArg::Context => ContractScope::Context,
            ScopeArg::Global => ContractScope::Global,
            ScopeArg::Tenant => ContractScope::Tenant,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QosArg {
    Unspecified,
    Level1,
    Level2,
    Level3,
}

impl From<QosArg> for QosClass {
    fn from(value: QosArg) -> Self {
        match value {
            QosArg::Unspecified => QosClass::Unspecified,
            QosArg::Level1 => QosClass::Level1,
            QosArg::Level2 => QosClass::Level2,
            QosArg::Level3 => QosClass::Level3,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTRACT SUBJECT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubjectArgs {
    #[command(subcommand)]
    pub command: SubjectCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubjectCommand {
    /// Ensure the contract subject exists with the given attributes
    Apply {
        /// Subject name
        name: String,

        /// Owning tenant (must already exist)
        #[arg(long, short = 't', required = true)]
        tenant: String,

        /// Owning contract (must already exist)
        #[arg(long, required = true)]
        contract: String,

        /// Subject description
        #[arg(long)]
        descr: Option<String>,

        /// QoS priority class
        #[arg(long, value_enum)]
        prio: Option<QosArg>,

        /// Reverse source/destination ports for return traffic
        #[arg(long, action = clap::ArgAction::Set)]
        reverse_filter_ports: Option<bool>,

        /// Apply filters in both directions (false = split in/out terms)
        #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
        both_directions: bool,

        /// Filters to attach bidirectionally (comma-separated)
        #[arg(long, value_delimiter = ',')]
        filters: Vec<String>,

        /// Filters for consumer-to-provider traffic (split mode)
        #[arg(long, value_delimiter = ',')]
        in_filters: Vec<String>,

        /// Filters for provider-to-consumer traffic (split mode)
        #[arg(long, value_delimiter = ',')]
        out_filters: Vec<String>,

        /// Service graph template to reference (not yet supported)
        #[arg(long)]
        service_graph: Option<String>,
    },

    /// Delete the contract subject
    #[command(alias = "rm")]
    Remove {
        /// Subject name
        name: String,

        /// Owning tenant
        #[arg(long, short = 't', required = true)]
        tenant: String,

        /// Owning contract
        #[arg(long, required = true)]
        contract: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (controller, username, insecure, timeout, ca_cert, ...)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

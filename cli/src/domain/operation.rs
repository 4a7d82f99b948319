//! The static operation table.
//!
//! Every subcommand linodectl exposes is one `Operation` variant. The table is
//! fixed at compile time; dispatch logging, usage signatures and the split between
//! instance-bound lifecycle operations and catalog reads all derive from it.

use std::fmt;

/// A named linodectl operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Boot,
    Create,
    Datacenters,
    Destroy,
    Distributions,
    Kernels,
    Linodes,
    Plans,
    Reboot,
    Resize,
    Shutdown,
}

/// Broad category of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Mutates an instance through the workflow engine.
    Lifecycle,
    /// Read-only provider listing that bypasses the workflow engine.
    Catalog,
}

impl Operation {
    /// All operations in alphabetical order.
    pub const ALL: [Self; 11] = [
        Self::Boot,
        Self::Create,
        Self::Datacenters,
        Self::Destroy,
        Self::Distributions,
        Self::Kernels,
        Self::Linodes,
        Self::Plans,
        Self::Reboot,
        Self::Resize,
        Self::Shutdown,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::Create => "create",
            Self::Datacenters => "datacenters",
            Self::Destroy => "destroy",
            Self::Distributions => "distributions",
            Self::Kernels => "kernels",
            Self::Linodes => "linodes",
            Self::Plans => "plans",
            Self::Reboot => "reboot",
            Self::Resize => "resize",
            Self::Shutdown => "shutdown",
        }
    }

    /// Look up an operation by its subcommand name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    #[must_use]
    pub fn kind(self) -> OperationKind {
        match self {
            Self::Datacenters
            | Self::Distributions
            | Self::Kernels
            | Self::Linodes
            | Self::Plans => OperationKind::Catalog,
            _ => OperationKind::Lifecycle,
        }
    }

    /// Whether the operation acts on an existing registry instance, and so
    /// needs its provider identity resolved first.
    #[must_use]
    pub fn requires_instance(self) -> bool {
        self.kind() == OperationKind::Lifecycle && self != Self::Create
    }

    /// Whether the operation is irreversible and goes through the
    /// confirmation gate.
    #[must_use]
    pub fn is_destructive(self) -> bool {
        self == Self::Destroy
    }

    /// One-line usage signature.
    #[must_use]
    pub fn signature(self) -> &'static str {
        match self {
            Self::Boot => "linodectl boot [name]",
            Self::Create => "linodectl create [name] [options]",
            Self::Datacenters => "linodectl datacenters",
            Self::Destroy => "linodectl destroy [name] [--force]",
            Self::Distributions => "linodectl distributions",
            Self::Kernels => "linodectl kernels",
            Self::Linodes => "linodectl linodes",
            Self::Plans => "linodectl plans",
            Self::Reboot => "linodectl reboot [name]",
            Self::Resize => "linodectl resize [name] [--plan-id ID | --plan-slug NAME]",
            Self::Shutdown => "linodectl shutdown [name]",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

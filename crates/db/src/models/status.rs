//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.  Exhaustive matching
//! over these enums is the only way status transitions are expressed --
//! no raw status literals appear outside this module.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Decode a database status ID, `None` for unknown values.
            pub fn from_id(id: StatusId) -> Option<Self> {
                $(
                    if id == $val {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Generation job lifecycle status.  Monotonic: Submitted -> Running
    /// -> Completed, never regressing (enforced with SQL guards in the
    /// job repository).
    JobStatus {
        Submitted = 1,
        Running = 2,
        Completed = 3,
    }
}

define_status_enum! {
    /// Per-screen component lifecycle status.
    ComponentStatus {
        Submitted = 1,
        Running = 2,
        Successful = 3,
        Failed = 4,
    }
}

define_status_enum! {
    /// How the planned screens relate to each other: a multi-screen flow
    /// or N variations of one screen.
    GenerationType {
        Flow = 1,
        Iteration = 2,
    }
}

impl GenerationType {
    /// Lowercase label used in prompt templates.
    pub fn label(self) -> &'static str {
        match self {
            GenerationType::Flow => "flow",
            GenerationType::Iteration => "iteration",
        }
    }
}

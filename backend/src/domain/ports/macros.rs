//! `define_port_error!` generates adapter error enums for driven ports.
//!
//! Every variant carries a single `message` describing the adapter failure.
//! The macro adds a snake_case constructor per variant taking
//! `impl Into<String>`, plus a [`message`](#method.message) accessor, so
//! adapters write `MissionPersistenceError::query(err.to_string())`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $display:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant { message: String },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                }
            )+

            /// Adapter detail, without the variant's prefix.
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } )|+ => message.as_str(),
                }
            }
        }
    };
}

pub(crate) use define_port_error;

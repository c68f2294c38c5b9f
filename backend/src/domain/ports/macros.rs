//! `define_port_error!`: declares a port error enum with `thiserror`
//! messages and one snake_case constructor per variant.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum StoreError {
            Unreachable => "store unreachable",
            Timeout { operation: String } => "store timed out during {operation}",
            Rejected { operation: String, rows: u32 } => "{operation} rejected after {rows} rows",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(StoreError::unreachable().to_string(), "store unreachable");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = StoreError::timeout("feed");
        assert_eq!(err.to_string(), "store timed out during feed");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = StoreError::rejected("decay", 3_u32);
        assert_eq!(err, StoreError::Rejected { operation: "decay".to_owned(), rows: 3 });
        assert_eq!(err.to_string(), "decay rejected after 3 rows");
    }
}

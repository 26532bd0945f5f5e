//! Macros for ergonomic model construction.

/// Declare a unit state type with its transitions.
///
/// Generates the struct, its `State` implementation named after the
/// struct, and its `StateDefinition`. `verify` takes a `fn(&Self) -> bool`
/// and defaults to always verified.
///
/// # Example
///
/// ```
/// use ladon::core::{StateDefinition, StateType};
/// use ladon::model_state;
/// use ladon::transition::Transition;
///
/// model_state! {
///     pub struct Cart;
///     transitions: vec![Transition::builder()
///         .from::<Cart>()
///         .to::<Receipt>()
///         .when_context(|ctx| ctx.flag("paid"))
///         .build()
///         .expect("cart transition")];
/// }
///
/// model_state! {
///     pub struct Receipt;
///     verify: |_| false;
///     transitions: Vec::new();
/// }
///
/// assert_eq!(StateType::of::<Cart>().name(), "Cart");
/// assert_eq!(Cart::transitions()[0].target_name(), "Receipt");
/// ```
#[macro_export]
macro_rules! model_state {
    (@verify $self:ident) => {
        true
    };

    (@verify $self:ident, $verify:expr) => {{
        let verify: fn(&Self) -> bool = $verify;
        verify($self)
    }};

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident;
        $(verify: $verify:expr;)?
        transitions: $transitions:expr $(;)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        $vis struct $name;

        impl $crate::core::State for $name {
            fn type_name(&self) -> &'static str {
                <Self as $crate::core::StateDefinition>::NAME
            }

            fn verify_as_current_state(&self) -> bool {
                $crate::model_state!(@verify self $(, $verify)?)
            }
        }

        impl $crate::core::StateDefinition for $name {
            const NAME: &'static str = stringify!($name);

            fn transitions() -> ::std::vec::Vec<$crate::transition::Transition> {
                $transitions
            }
        }
    };
}

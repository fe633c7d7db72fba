//! Request and response shapes of every remote operation, with their
//! [`Operation`](crate::Operation) contracts and typed adapter methods on
//! [`ServiceClients`](crate::ServiceClients).

/// Declares a body-carrying operation that returns the envelope's `data`
/// unchanged, plus its adapter method.
macro_rules! json_operation {
    (
        $(#[$meta:meta])*
        $op:ident {
            name: $name:literal,
            target: $target:ident,
            method: $method:ident,
            path: $path:literal,
            request: $request:ty,
            data: $data:ty,
            adapter: $adapter:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $op;

        impl $crate::operation::Operation for $op {
            type Request = $request;
            type Data = $data;
            type Output = $data;

            const NAME: &'static str = $name;
            const TARGET: $crate::operation::Target = $crate::operation::Target::$target;
            const METHOD: ::http::Method = ::http::Method::$method;
            const PATH: &'static str = $path;

            fn extract(data: Self::Data) -> Self::Output {
                data
            }
        }

        impl $crate::client::ServiceClients {
            #[doc = concat!("`", stringify!($method), " ", $path, "` on the ", stringify!($target), " target.")]
            ///
            /// # Errors
            /// See [`CallError`](crate::CallError).
            pub async fn $adapter(
                &self,
                request: &$request,
            ) -> Result<$data, $crate::error::CallError> {
                self.call::<$op>(request).await
            }
        }
    };
}

pub mod auth;
pub mod authorization;
pub mod credential;
pub mod rave;
pub mod wallet;

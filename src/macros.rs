//! Marker macros
//!
//! Each macro captures the call site of the function it is written in, so
//! the rendered line names the calling type and method without any runtime
//! stack walking.
//!
//! # Examples
//!
//! ```
//! use callsite_logger::prelude::*;
//! use callsite_logger::{called, error, info, prop};
//!
//! let logger = Logger::builder().background_flush(false).build().unwrap();
//!
//! fn resize(logger: &Logger, width: u32, height: u32) {
//!     called!(logger, width, height);
//! }
//!
//! resize(&logger, 640, 480);
//! prop!(logger, 42);
//! prop!(logger, "score", 43);
//! info!(logger, "loaded {} items", 3);
//! error!(logger, "disk full");
//! assert_eq!(logger.pending(), 5);
//! ```

/// Capture the call site of the enclosing function.
///
/// # Examples
///
/// ```
/// use callsite_logger::CallerResolver;
///
/// mod shapes {
///     pub fn area() -> callsite_logger::CallSite {
///         callsite_logger::call_site!()
///     }
/// }
///
/// let caller = CallerResolver::resolve(shapes::area()).unwrap();
/// assert_eq!(caller.declaring_type, "shapes");
/// assert_eq!(caller.method_name, "area");
/// ```
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __callsite() {}
        $crate::CallSite::new($crate::core::call_site::type_name_of(__callsite))
    }};
}

/// Record that the enclosing function was entered.
///
/// List the function's parameters by name; their types and `Display` values
/// are captured.
///
/// # Examples
///
/// ```
/// # use callsite_logger::prelude::*;
/// # let logger = Logger::builder().background_flush(false).build().unwrap();
/// use callsite_logger::called;
///
/// fn connect(logger: &Logger, host: &str, port: u16) {
///     called!(logger, host, port);
/// }
///
/// fn reset(logger: &Logger) {
///     called!(logger);
/// }
/// # connect(&logger, "localhost", 8080);
/// # reset(&logger);
/// ```
#[macro_export]
macro_rules! called {
    ($logger:expr $(,)?) => {
        $logger.called($crate::call_site!(), ::std::vec::Vec::new())
    };
    ($logger:expr, $($param:ident),+ $(,)?) => {
        $logger.called(
            $crate::call_site!()$(.param($crate::Param::of(stringify!($param), &$param)))+,
            ::std::vec![$($crate::Argument::new(&$param)),+],
        )
    };
}

/// Record a property change from a setter.
///
/// Without a name the property is named after the enclosing method, minus a
/// leading `set_`.
///
/// # Examples
///
/// ```
/// # use callsite_logger::prelude::*;
/// use callsite_logger::prop;
///
/// struct Player {
///     score: u32,
///     logger: Logger,
/// }
///
/// impl Player {
///     fn set_score(&mut self, score: u32) {
///         self.score = score;
///         prop!(self.logger, score);
///     }
/// }
/// # let logger = Logger::builder().background_flush(false).build().unwrap();
/// # let mut player = Player { score: 0, logger };
/// # player.set_score(3);
/// ```
#[macro_export]
macro_rules! prop {
    ($logger:expr, $name:literal, $value:expr $(,)?) => {
        $logger.prop($crate::call_site!(), ::std::option::Option::Some($name), &$value)
    };
    ($logger:expr, $value:expr $(,)?) => {
        $logger.prop($crate::call_site!(), ::std::option::Option::None, &$value)
    };
}

/// Record an informational message.
///
/// # Examples
///
/// ```
/// # use callsite_logger::prelude::*;
/// # let logger = Logger::builder().background_flush(false).build().unwrap();
/// use callsite_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info($crate::call_site!(), ::std::format!($($arg)+))
    };
}

/// Record an error message.
///
/// # Examples
///
/// ```
/// # use callsite_logger::prelude::*;
/// # let logger = Logger::builder().background_flush(false).build().unwrap();
/// use callsite_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error($crate::call_site!(), ::std::format!($($arg)+))
    };
}

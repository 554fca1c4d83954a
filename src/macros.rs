//===========================================================================//

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! malformed_input {
    ($path:expr, $fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::AssembleError::MalformedInput {
            path: ::std::path::PathBuf::from($path),
            reason: format!($fmt, $($arg)+),
        })
    };
}

//===========================================================================//

use crate::error::CsrfError;

pub fn exit_code_for_error(err: &CsrfError) -> i32 {
    match err {
        CsrfError::TokenNotFound(_) => 1,
        CsrfError::Config(_) => 2,
        CsrfError::InvalidUrl(_) => 3,
        CsrfError::Unsupported(_) => 4,
        CsrfError::Io(err) => io_exit_code(err),
        CsrfError::Json(_) => 26,
        CsrfError::PermissionDenied(_) | CsrfError::FileNotFound(_) => 37,
        CsrfError::BrowserCookie(_) => 43,
    }
}

fn io_exit_code(err: &std::io::Error) -> i32 {
    match err.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => 37,
        _ => 23,
    }
}

#[cfg(test)]
mod tests {
    use super::exit_code_for_error;
    use crate::error::CsrfError;

    #[test]
    fn exit_code_maps_missing_token() {
        let err = CsrfError::TokenNotFound("csrftoken".to_string());
        assert_eq!(exit_code_for_error(&err), 1);
    }

    #[test]
    fn exit_code_maps_config() {
        let err = CsrfError::Config("bad".to_string());
        assert_eq!(exit_code_for_error(&err), 2);
    }

    #[test]
    fn exit_code_maps_io_not_found_like_missing_file() {
        let err = CsrfError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(exit_code_for_error(&err), 37);
        let err = CsrfError::Io(std::io::Error::from(std::io::ErrorKind::WriteZero));
        assert_eq!(exit_code_for_error(&err), 23);
    }
}

//! Unit tests for error.rs

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("vkCmdClearColorImage rejected".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("vkCmdClearColorImage rejected"));
}

#[test]
fn test_out_of_memory_display() {
    assert_eq!(format!("{}", Error::OutOfMemory), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("first_layer 3 > last_layer 1".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid resource"));
    assert!(display.contains("first_layer 3"));
}

#[test]
fn test_invalid_state_display() {
    let err = Error::InvalidState("Command list not recording".to_string());
    assert_eq!(format!("{}", err), "Invalid state: Command list not recording");
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("No Vulkan-capable GPU found".to_string());
    assert!(format!("{}", err).contains("No Vulkan-capable GPU found"));
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug_names_variant() {
    assert!(format!("{:?}", Error::InvalidState("x".to_string())).contains("InvalidState"));
    assert!(format!("{:?}", Error::BackendError("x".to_string())).contains("BackendError"));
}

#[test]
fn test_error_clone_keeps_message() {
    let err = Error::InvalidResource("missing image".to_string());
    let copy = err.clone();
    assert_eq!(format!("{}", err), format!("{}", copy));
}

// ============================================================================
// PROPAGATION
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<u32> {
        Err(Error::InvalidState("Not inside a render pass".to_string()))
    }

    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    match outer() {
        Err(Error::InvalidState(msg)) => assert_eq!(msg, "Not inside a render pass"),
        other => panic!("unexpected result: {:?}", other),
    }
}

//! Post-processing options.

/// Options for [`post_process_blocks`](super::post_process_blocks).
#[derive(Debug, Clone)]
pub struct PostProcessOptions {
    /// Only convert tables; skip equations and filtering
    pub simple_post_process: bool,

    /// Combine equations that share an `equation_block` parent
    pub handle_equation_block: bool,

    /// Drop list blocks
    pub abandon_list: bool,

    /// Drop headers, footers and page numbers
    pub abandon_paratext: bool,
}

impl PostProcessOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only convert tables.
    pub fn simple(mut self) -> Self {
        self.simple_post_process = true;
        self
    }

    /// Enable or disable equation-block combination.
    pub fn with_equation_block(mut self, enable: bool) -> Self {
        self.handle_equation_block = enable;
        self
    }

    /// Enable or disable dropping list blocks.
    pub fn with_abandon_list(mut self, abandon: bool) -> Self {
        self.abandon_list = abandon;
        self
    }

    /// Enable or disable dropping page furniture.
    pub fn with_abandon_paratext(mut self, abandon: bool) -> Self {
        self.abandon_paratext = abandon;
        self
    }
}

impl Default for PostProcessOptions {
    fn default() -> Self {
        Self {
            simple_post_process: false,
            handle_equation_block: true,
            abandon_list: false,
            abandon_paratext: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = PostProcessOptions::default();
        assert!(!opts.simple_post_process);
        assert!(opts.handle_equation_block);
        assert!(!opts.abandon_list);
        assert!(!opts.abandon_paratext);
    }

    #[test]
    fn test_builder() {
        let opts = PostProcessOptions::new()
            .simple()
            .with_equation_block(false)
            .with_abandon_list(true)
            .with_abandon_paratext(true);
        assert!(opts.simple_post_process);
        assert!(!opts.handle_equation_block);
        assert!(opts.abandon_list);
        assert!(opts.abandon_paratext);
    }
}

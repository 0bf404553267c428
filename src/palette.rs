/// A fixed color cycle passed explicitly into every recipe. Keeping the
/// cycle a value rather than module state lets tests pin colors per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCycle {
    colors: Vec<String>,
}

impl ColorCycle {
    /// The classic seven-color plotting cycle.
    pub fn classic() -> Self {
        Self {
            colors: vec![
                "blue".to_string(),
                "green".to_string(),
                "red".to_string(),
                "cyan".to_string(),
                "magenta".to_string(),
                "yellow".to_string(),
                "black".to_string(),
            ],
        }
    }

    pub fn from_colors(colors: Vec<String>) -> Self {
        Self { colors }
    }

    /// Color at cycle position `index`, wrapping around.
    pub fn get(&self, index: usize) -> String {
        self.colors[index % self.colors.len()].clone()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_cycle_wraps() {
        let cycle = ColorCycle::classic();
        assert_eq!(cycle.get(0), "blue");
        assert_eq!(cycle.get(7), "blue");
        assert_eq!(cycle.get(9), "red");
    }

    #[test]
    fn test_custom_cycle() {
        let cycle = ColorCycle::from_colors(vec!["red".to_string(), "black".to_string()]);
        assert_eq!(cycle.get(3), "black");
    }
}

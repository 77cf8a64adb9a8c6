use crate::formats::FormatParser;
use crate::grid::LevelGrid;
use crate::LoadError;

/// Plain-text corpus: levels of tile symbols separated by blank lines.
///
/// Lines starting with `;` are comments and ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextCorpusParser;

impl TextCorpusParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for TextCorpusParser {
    fn format_name(&self) -> &'static str {
        "Plain text levels"
    }

    fn parse(&self, content: &str) -> Result<Vec<LevelGrid>, LoadError> {
        let mut levels = Vec::new();
        let mut block = String::new();

        let lines = content
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.starts_with(';'))
            .chain(std::iter::once(""));
        for line in lines {
            if line.is_empty() {
                if !block.is_empty() {
                    let index = levels.len();
                    let level = block
                        .parse::<LevelGrid>()
                        .map_err(|source| LoadError::InvalidLevel { index, source })?;
                    levels.push(level);
                    block.clear();
                }
                continue;
            }
            block.push_str(line);
            block.push('\n');
        }

        if levels.is_empty() {
            return Err(LoadError::InvalidData(
                "Corpus contains no levels.".to_owned(),
            ));
        }
        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_levels_on_blank_lines() {
        let content = "; two tiny levels\n.M\nBB\n\n\nG.\nbB\n";
        let levels = TextCorpusParser::new().parse(content).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].to_string(), ".M\nBB");
        assert_eq!(levels[1].to_string(), "G.\nbB");
    }

    #[test]
    fn reports_index_of_bad_level() {
        let content = "..\nBB\n\n...\nBB\n";
        match TextCorpusParser::new().parse(content) {
            Err(LoadError::InvalidLevel { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected InvalidLevel, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_corpus() {
        assert!(matches!(
            TextCorpusParser::new().parse("; nothing\n\n"),
            Err(LoadError::InvalidData(_))
        ));
    }
}

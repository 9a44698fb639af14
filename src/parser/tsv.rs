//! Parses tab separated annotation files
//!
//! All files share the same layout: one record per line, columns separated
//! by tabs, and an optional header line starting with `#` or `gene`.
//! Empty lines and comment lines are skipped.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, error, trace};

use crate::annotations::{AnnotationRecord, GeneId, PathwayLink, PathwayTable};
use crate::term::TermMeta;
use crate::{EnrichError, EnrichResult};

/// Opens `filename` for buffered reading
///
/// # Errors
///
/// [`EnrichError::CannotOpenFile`] if the file does not exist or cannot be read
pub fn open<P: AsRef<Path>>(filename: P) -> EnrichResult<BufReader<File>> {
    let name = filename.as_ref().display().to_string();
    let file = File::open(filename).map_err(|_| EnrichError::CannotOpenFile(name))?;
    Ok(BufReader::new(file))
}

/// Parses Gene Ontology annotations
///
/// ```text
/// gene    term        ontology
/// 7157    GO:0006977  BP
/// 7157    GO:0005634  cellular_component
/// ```
///
/// # Errors
///
/// - [`EnrichError::InvalidInput`] if a line has less than three columns
/// - [`EnrichError::InvalidOntology`] if the ontology column is invalid
pub fn read_go_annotation<R: BufRead>(reader: R) -> EnrichResult<Vec<AnnotationRecord>> {
    let records = parse(reader, go_line)?;
    debug!("Parsed {} GO annotation records", records.len());
    Ok(records)
}

/// Parses gene to pathway links together with the pathway names
///
/// ```text
/// gene    pathway     name
/// 7157    hsa04115    p53 signaling pathway
/// ```
///
/// The first name of every pathway is used.
///
/// # Errors
///
/// [`EnrichError::InvalidInput`] if a line has less than three columns
pub fn read_pathways<R: BufRead>(reader: R) -> EnrichResult<PathwayTable> {
    let mut links = Vec::new();
    let mut names: HashMap<String, String> = HashMap::new();
    let mut order = Vec::new();

    for (link, name) in parse(reader, pathway_line)? {
        if !names.contains_key(link.term().as_str()) {
            order.push(link.term().to_string());
            names.insert(link.term().to_string(), name);
        }
        links.push(link);
    }

    let terms = order
        .into_iter()
        .map(|term| {
            let name = names.remove(&term).unwrap_or_default();
            TermMeta::new(term, &name)
        })
        .collect();
    debug!("Parsed {} pathway links", links.len());
    Ok(PathwayTable::new(links, terms))
}

/// Parses the display names of genes
///
/// ```text
/// gene    symbol
/// 7157    TP53
/// ```
///
/// # Errors
///
/// [`EnrichError::InvalidInput`] if a line has less than two columns
pub fn read_symbols<R: BufRead>(reader: R) -> EnrichResult<HashMap<GeneId, String>> {
    Ok(parse(reader, symbol_line)?.into_iter().collect())
}

fn is_header(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("gene")
}

fn parse<R, T, F>(reader: R, parse_line: F) -> EnrichResult<Vec<T>>
where
    R: BufRead,
    F: Fn(&str) -> EnrichResult<T>,
{
    let mut parsed = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|_| {
            EnrichError::InvalidInput(format!("Invalid data in line {}", idx + 1))
        })?;
        if line.trim().is_empty() || line.starts_with('#') || (idx == 0 && is_header(&line)) {
            trace!("Skipping line {}: {}", idx + 1, line);
            continue;
        }
        match parse_line(&line) {
            Ok(record) => parsed.push(record),
            Err(err) => {
                error!("Invalid line {}: {}", idx + 1, line);
                return Err(err);
            }
        }
    }
    Ok(parsed)
}

fn go_line(line: &str) -> EnrichResult<AnnotationRecord> {
    let mut cols = line.split('\t');

    // Column 1 is the gene identifier
    let Some(gene) = cols.next() else {
        return Err(EnrichError::InvalidInput(line.to_string()));
    };

    // Column 2 is the GO term
    let Some(term) = cols.next() else {
        return Err(EnrichError::InvalidInput(line.to_string()));
    };

    // Column 3 is the base ontology
    let Some(ontology) = cols.next() else {
        return Err(EnrichError::InvalidInput(line.to_string()));
    };

    Ok(AnnotationRecord::new(gene.trim(), term.trim(), ontology.parse()?))
}

fn pathway_line(line: &str) -> EnrichResult<(PathwayLink, String)> {
    let mut cols = line.split('\t');

    let Some(gene) = cols.next() else {
        return Err(EnrichError::InvalidInput(line.to_string()));
    };

    let Some(term) = cols.next() else {
        return Err(EnrichError::InvalidInput(line.to_string()));
    };

    let Some(name) = cols.next() else {
        return Err(EnrichError::InvalidInput(line.to_string()));
    };

    Ok((PathwayLink::new(gene.trim(), term.trim()), name.trim().to_string()))
}

fn symbol_line(line: &str) -> EnrichResult<(GeneId, String)> {
    let Some((gene, symbol)) = line.split_once('\t') else {
        return Err(EnrichError::InvalidInput(line.to_string()));
    };
    Ok((GeneId::from(gene.trim()), symbol.trim().to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::BaseOntology;

    #[test]
    fn go_annotation_with_header() {
        let data = "gene\tterm\tontology\n7157\tGO:0006977\tBP\n7157\tGO:0005634\tcellular_component\n";
        let records = read_go_annotation(BufReader::new(data.as_bytes())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].gene().as_str(), "7157");
        assert_eq!(records[0].term().as_str(), "GO:0006977");
        assert_eq!(records[0].ontology(), BaseOntology::Bp);
        assert_eq!(records[1].ontology(), BaseOntology::Cc);
    }

    #[test]
    fn go_annotation_without_header() {
        let data = "7157\tGO:0006977\tMF\n\n# comment\n1\tGO:1\tbp";
        let records = read_go_annotation(BufReader::new(data.as_bytes())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].ontology(), BaseOntology::Bp);
    }

    #[test]
    fn go_annotation_missing_column() {
        let data = "7157\tGO:0006977\n";
        let res = read_go_annotation(BufReader::new(data.as_bytes()));
        assert_eq!(res.unwrap_err(), EnrichError::InvalidInput("7157\tGO:0006977".to_string()));
    }

    #[test]
    fn go_annotation_invalid_ontology() {
        let data = "7157\tGO:0006977\tKEGG\n";
        let res = read_go_annotation(BufReader::new(data.as_bytes()));
        assert!(matches!(res, Err(EnrichError::InvalidOntology(_))));
    }

    #[test]
    fn gene_column_is_header_only_in_first_line() {
        let data = "1\tGO:1\tBP\ngeneX\tGO:1\tBP\n";
        let records = read_go_annotation(BufReader::new(data.as_bytes())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].gene().as_str(), "geneX");
    }

    #[test]
    fn pathways() {
        let data = "#gene\tpathway\tname\n1\thsa00010\tGlycolysis\n2\thsa00010\tGlycolysis / Gluconeogenesis\n1\thsa04115\tp53 signaling\n";
        let table = read_pathways(BufReader::new(data.as_bytes())).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.terms().len(), 2);
        assert_eq!(table.terms()[0].id().as_str(), "hsa00010");
        assert_eq!(table.terms()[0].name(), "Glycolysis");
        assert_eq!(table.terms()[1].name(), "p53 signaling");
    }

    #[test]
    fn symbols() {
        let data = "gene\tsymbol\n7157\tTP53\n672\tBRCA1\n";
        let symbols = read_symbols(BufReader::new(data.as_bytes())).unwrap();
        assert_eq!(symbols.get("7157").unwrap(), "TP53");
        assert_eq!(symbols.len(), 2);

        assert!(read_symbols(BufReader::new("7157 TP53\n".as_bytes())).is_err());
    }
}

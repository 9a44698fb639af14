use std::process;

use goenrich::parser::FolderSource;
use goenrich::prune::TermPruner;
use goenrich::result::TermTable;
use goenrich::stats::{EnrichParams, Hypergeometric};
use goenrich::{AnalysisRequest, AnalysisResult, Enricher, GeneId, Genes};

fn main() {
    simple_logger::init_with_env().unwrap();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 6 {
        println!("Over-representation analysis of a gene list\n\n");
        println!("Usage\nenrichment <FOLDER> <ORGANISM> <NAMESPACE> <ONTOLOGY> <GENE,GENE,...> [LEVEL]");
        println!("\nenrichment annotations hsa ENTREZID BP 7157,672,675 2\n");
        process::exit(1)
    }

    let source = FolderSource::new(&args[1]);
    let hierarchy = source.hierarchy().expect("go-basic.obo must be present");
    let enricher = Enricher::new(source.clone()).with_mapper(source);

    let genes: Genes = args[5].split(',').map(GeneId::from).collect();
    let level = args.get(6).map(|arg| arg.parse::<usize>().expect("level must be a number"));
    let request = AnalysisRequest::new(args[2].as_str(), args[3].as_str(), &args[4]).with_readable(true);

    let result = match enricher.enrich_go(&Hypergeometric, &genes, &request, &EnrichParams::default()) {
        Ok(Some(result)) => result,
        Ok(None) => {
            println!("No enriched terms");
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1)
        }
    };

    let result = TermPruner::new(&hierarchy)
        .drop(AnalysisResult::from(result), level, &[])
        .expect("pruning must keep the result consistent");

    for row in result.rows() {
        println!("{row}");
    }
    println!("\nTerms: {}", result.len());
}

use itertools::Itertools;
use oxrdf::Graph;
use rdfa_extract::{DictionaryCollector, GraphCollector, ParseOptions, ScreenCollector};

#[allow(unused)]
pub const BNODE: &str = rdfa_extract::DEFAULT_BLANK_NODE_NAMESPACE;

#[allow(unused)]
pub fn base(iri: &str) -> ParseOptions {
    ParseOptions::default().with_base_uri(iri)
}

/// Everything a `ScreenCollector` prints for `source`.
#[allow(unused)]
pub fn screen(source: &str, options: &ParseOptions, print_debug: bool) -> String {
    let mut collector = ScreenCollector::new(Vec::new()).with_debug(print_debug);
    rdfa_extract::parse(source, options, &mut collector).unwrap();
    String::from_utf8(collector.finish().unwrap()).unwrap()
}

#[allow(unused)]
pub fn dictionary(source: &str, options: &ParseOptions) -> DictionaryCollector {
    let mut collector = DictionaryCollector::new();
    rdfa_extract::parse(source, options, &mut collector).unwrap();
    collector
}

/// One N-Triples line per triple, sorted.
#[allow(unused)]
pub fn serialize_graph(graph: &Graph) -> String {
    graph.iter().map(|t| t.to_string()).sorted().join("\n")
}

#[allow(unused)]
pub fn graphs(html: &str, options: &ParseOptions, html5: bool) -> (Graph, Graph) {
    let mut output_graph = Graph::new();
    let mut processor_graph = Graph::new();
    let mut collector = GraphCollector::new(&mut output_graph, &mut processor_graph);
    if html5 {
        rdfa_extract::parse_html(html, options, &mut collector).unwrap();
    } else {
        rdfa_extract::parse(html, options, &mut collector).unwrap();
    }

    (output_graph, processor_graph)
}

#[allow(unused)]
pub fn assert_graph(html: &str, options: &ParseOptions, html5: bool, ttl: &str) {
    let (output_graph, processor_graph) = graphs(html, options, html5);

    let mut ttl_graph = Graph::new();
    {
        let ttl_rdf = oxttl::TurtleParser::new().for_slice(ttl.as_bytes());
        for triple in ttl_rdf {
            ttl_graph.insert(&triple.unwrap());
        }
    }

    pretty_assertions::assert_eq!(serialize_graph(&processor_graph), "");
    pretty_assertions::assert_eq!(serialize_graph(&output_graph), serialize_graph(&ttl_graph));
}

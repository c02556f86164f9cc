use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("quarry")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Query HTML, XML and JSON documents")
        .arg(clap::arg!([INPUT] "URL to fetch, local file, or '-' for stdin"))
        .arg(clap::arg!(-q --query <QUERY> "Query to run").value_name("QUERY"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Document format (html, xml, json)")
                .value_name("FORMAT")
                .value_parser(["html", "xml", "json"]),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(
            clap::Arg::new("user-agent")
                .long("user-agent")
                .value_name("UA")
                .help("Custom User-Agent for HTTP requests"),
        )
        .arg(
            clap::Arg::new("text-limit")
                .long("text-limit")
                .value_name("NUM")
                .default_value("200")
                .help("Characters of element text shown before truncating"),
        )
        .arg(clap::arg!(--examples "Print query examples for the format and exit"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "quarry", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "quarry", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "quarry", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "quarry", &completions_dir).unwrap();
}

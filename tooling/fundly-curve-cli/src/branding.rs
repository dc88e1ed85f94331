use colored::*;

pub fn print_logo() {
    let logo = r#"
  _____ _   _ _   _ ____  _  __   __
 |  ___| | | | \ | |  _ \| | \ \ / /
 | |_  | | | |  \| | | | | |  \ V /
 |  _| | |_| | |\  | |_| | |___| |
 |_|    \___/|_| \_|____/|_____|_|
"#;
    println!("{}", logo.cyan().bold());
    println!(
        "{}",
        "      Bonding Curve & Launch Market Cap Analyzer"
            .white()
            .italic()
    );
    println!(
        "{}",
        "      v0.1.0 | constant-product pricing, virtual reserves".dimmed()
    );
    println!();
}

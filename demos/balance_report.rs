// Fill the set with a run of ascending keys and print the in-order
// balance report, the way the tree is usually eyeballed while debugging.
use aplomb::Set;

fn main() {
    let mut set = Set::new();

    println!("Inserting integer values 1 to 100");
    for key in 1..=100 {
        set.insert(key);
    }

    let report: Vec<String> = set.balances().map(|b| b.to_string()).collect();
    println!("Printing balance: {}", report.join(" "));
}

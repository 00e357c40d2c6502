//! K-means (k=3) on a small 2D dataset, with both initialization policies.
//!
//! Run with `RUST_LOG=debug` to see initialization and convergence events.

use env_logger::Env;
use lloyd::{EmptyClusterPolicy, InitPolicy, Kmeans};

fn main() {
    env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "info"));

    // Three visual groups: low (1, 4, 9), middle (0, 5, 6), high (2, 3, 7, 8).
    let data: Vec<Vec<f64>> = vec![
        vec![73.0, 72.6],
        vec![61.0, 54.4],
        vec![67.0, 99.9],
        vec![68.0, 97.3],
        vec![62.0, 59.0],
        vec![75.0, 81.6],
        vec![74.0, 77.1],
        vec![66.0, 97.3],
        vec![68.0, 93.3],
        vec![61.0, 59.0],
    ];

    for init in [InitPolicy::RandomCentroids, InitPolicy::RandomClusters] {
        let kmeans = Kmeans::new(3)
            .with_init(init)
            .with_seed(42)
            .with_empty_cluster_policy(EmptyClusterPolicy::Reseed);

        println!("=== K-means (k=3, {:?}) ===", init);
        match kmeans.fit(&data) {
            Ok(fit) => {
                for (i, label) in fit.labels.iter().enumerate() {
                    println!(
                        "  point {:2} ({:5.1}, {:5.1}) => cluster {}",
                        i, data[i][0], data[i][1], label
                    );
                }
                for (c, centroid) in fit.centroids.iter().enumerate() {
                    println!("  centroid {} = ({:6.2}, {:6.2})", c, centroid[0], centroid[1]);
                }
                println!(
                    "  {} iterations, {} init draw(s), inertia {:.3}\n",
                    fit.iterations, fit.init_attempts, fit.inertia
                );
            }
            Err(e) => println!("  failed: {e}\n"),
        }
    }
}

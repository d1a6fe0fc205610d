//! Command-line ECF lookup tool
//!
//! # Usage
//!
//! ```bash
//! # XMM-EPIC pn, Medium filter, 1-2 keV band
//! cargo run --bin ecf_lookup -- xmm-epic EPN Medium --eband 3 --nh 5e21 --gamma 1.9
//!
//! # Swift-XRT photon-counting mode, grades 0-4, with absorption correction
//! cargo run --bin ecf_lookup -- swift-xrt pc --grade 04 --eband 2 --abscorr
//!
//! # eROSITA at a specific observation date
//! cargo run --bin ecf_lookup -- erosita --eband P3 --date 2021-03-14
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use xray_ecf::{Ecf, EcfParams, Erosita, SwiftXrt, XmmEpic};

#[derive(Parser)]
#[command(author, version, about = "Look up energy conversion factors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// eROSITA on-board Spektr-RG
    Erosita {
        /// Energy band
        #[arg(long, default_value = "SOFT")]
        eband: String,

        #[command(flatten)]
        spectrum: Spectrum,
    },

    /// XRT on-board Swift
    SwiftXrt {
        /// Operation mode: wt or pc
        mode: String,

        /// Event grade selection
        #[arg(long, default_value = "0")]
        grade: String,

        /// Energy band
        #[arg(long, default_value = "SOFT")]
        eband: String,

        #[command(flatten)]
        spectrum: Spectrum,
    },

    /// EPIC cameras on-board XMM-Newton
    XmmEpic {
        /// Detector: EPN, EMOS1 or EMOS2
        detector: String,

        /// Filter: Thin, Medium or Thick
        filter: String,

        /// Operation mode (defaults to ff for pn, im for MOS)
        #[arg(long)]
        mode: Option<String>,

        /// Energy band
        #[arg(long, default_value = "SOFT")]
        eband: String,

        #[command(flatten)]
        spectrum: Spectrum,
    },
}

#[derive(Args)]
struct Spectrum {
    /// Hydrogen column density in cm^-2
    #[arg(long, default_value_t = xray_ecf::DEFAULT_NH)]
    nh: f64,

    /// Photon index of the assumed power law
    #[arg(long, default_value_t = xray_ecf::DEFAULT_GAMMA)]
    gamma: f64,

    /// Apply the Galactic absorption correction
    #[arg(long)]
    abscorr: bool,

    /// Observation date (YYYY-MM-DD) used to pick the calibration epoch
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl Spectrum {
    fn params(&self) -> EcfParams {
        EcfParams {
            nh: self.nh,
            gamma: self.gamma,
            abscorr: self.abscorr,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let ecf: Ecf = match cli.command {
        Commands::Erosita { eband, spectrum } => {
            let mut builder = Erosita::builder().eband(&eband);
            if let Some(date) = spectrum.date {
                builder = builder.date(date);
            }
            let model = builder.build()?;
            println!(
                "eROSITA eband={} epoch={}",
                model.eband(),
                model.epoch()
            );
            model.ecf(spectrum.params())
        }

        Commands::SwiftXrt {
            mode,
            grade,
            eband,
            spectrum,
        } => {
            let mut builder = SwiftXrt::builder(&mode).grade(&grade).eband(&eband);
            if let Some(date) = spectrum.date {
                builder = builder.date(date);
            }
            let model = builder.build()?;
            println!(
                "Swift-XRT mode={} grade={} eband={} epoch={}",
                model.mode(),
                model.grade(),
                model.eband(),
                model.epoch()
            );
            model.ecf(spectrum.params())
        }

        Commands::XmmEpic {
            detector,
            filter,
            mode,
            eband,
            spectrum,
        } => {
            let mut builder = XmmEpic::builder(&detector, &filter).eband(&eband);
            if let Some(mode) = mode.as_deref() {
                builder = builder.mode(mode);
            }
            if let Some(date) = spectrum.date {
                builder = builder.date(date);
            }
            let model = builder.build()?;
            println!(
                "XMM-EPIC detector={} filter={} mode={} eband={} epoch={}",
                model.detector().tag(),
                model.filter(),
                model.mode(),
                model.eband(),
                model.epoch()
            );
            model.ecf(spectrum.params())
        }
    };

    println!("{ecf}");
    Ok(())
}

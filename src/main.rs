use chem_domain::{BuildingBlockPolicy, CompoundRef, SourceIdentity, StandardizedReaction};
use chem_persistence::DieselChemRepository;
use chem_providers::{PooledCompoundStandardizer, PooledReactionStandardizer, WorkerPool};
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

/// Menú interactivo para administrar el almacén químico.
///
/// Opciones soportadas:
/// 1) Crear tablas
/// 2) Contar filas por tabla
/// 3) Ingerir un fichero de compuestos o reacciones en la capa archive
/// 4) Migrar archive -> workbench
/// 5) Consultar rutas de síntesis invertidas (JSON)
/// 6) Eliminar tablas
/// 7) Salir
fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let repo = DieselChemRepository::from_env()?;
    let workers = Arc::new(WorkerPool::from_env()?);
    log::info!("store ready on {} with {} workers", repo.config().database_url, workers.workers());

    loop {
        println!("\n== ChemRoute menu ==");
        println!("1) Crear tablas");
        println!("2) Contar filas por tabla");
        println!("3) Ingerir fichero en archive");
        println!("4) Migrar archive -> workbench");
        println!("5) Rutas de síntesis invertidas");
        println!("6) Eliminar tablas");
        println!("7) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => match repo.create_all_tables() {
                Ok(()) => println!("Tablas creadas"),
                Err(e) => eprintln!("Error creando tablas: {}", e),
            },
            "2" => match repo.table_counts() {
                Ok(counts) => {
                    println!("\nTABLA                                              | FILAS");
                    println!("------------------------------------------------------------");
                    for (table, n) in counts {
                        println!("{:<50} | {}", table, n);
                    }
                }
                Err(e) => eprintln!("Error contando filas: {}", e),
            },
            "3" => {
                let path = prompt("Ruta del fichero (una cadena por línea): ")?;
                let kind = prompt("Tipo (c = compuestos, r = reacciones): ")?;
                let name = prompt("Nombre de la fuente: ")?;
                let version = prompt("Versión de la fuente: ")?;
                let source = match SourceIdentity::new(name.trim(), version.trim(), path.trim()) {
                    Ok(s) => s,
                    Err(e) => { eprintln!("Fuente inválida: {}", e); continue; }
                };
                let lines = match std::fs::read_to_string(path.trim()) {
                    Ok(text) => read_records(&text),
                    Err(e) => { eprintln!("No se pudo leer {}: {}", path.trim(), e); continue; }
                };
                let result = match kind.trim() {
                    "c" => repo.insert_archive_compounds(&lines, &source),
                    "r" => repo.insert_archive_reactions(&lines, &source),
                    other => { eprintln!("Tipo inválido: {}", other); continue; }
                };
                match result {
                    Ok(summary) => println!("Ingesta completada: {:?}", summary),
                    Err(e) => eprintln!("Error en la ingesta: {}", e),
                }
            }
            "4" => {
                let bb = prompt("¿Marcar compuestos como building blocks? (s/n/enter para no tocar): ")?;
                let policy = match bb.trim() {
                    "s" => BuildingBlockPolicy::Set(true),
                    "n" => BuildingBlockPolicy::Set(false),
                    _ => BuildingBlockPolicy::Keep,
                };
                let compounds = PooledCompoundStandardizer::new(Arc::clone(&workers), trim_record);
                match repo.migrate_archive_to_workbench_compounds(&compounds, policy, None) {
                    Ok(summary) => println!("Compuestos migrados: {:?}", summary),
                    Err(e) => { eprintln!("Error migrando compuestos: {}", e); continue; }
                }
                let reactions = PooledReactionStandardizer::new(Arc::clone(&workers), split_reaction);
                match repo.migrate_archive_to_workbench_reactions(&reactions, None) {
                    Ok(summary) => println!("Reacciones migradas: {:?}", summary),
                    Err(e) => eprintln!("Error migrando reacciones: {}", e),
                }
            }
            "5" => {
                let target = prompt("Compuesto objetivo (id o SMILES): ")?;
                let target = match target.trim().parse::<i64>() {
                    Ok(id) => CompoundRef::Id(id),
                    Err(_) => CompoundRef::Smiles(target.trim().to_string()),
                };
                let depth_s = prompt("Profundidad máxima (número entero): ")?;
                let max_depth: i64 = match depth_s.trim().parse() {
                    Ok(n) => n,
                    Err(_) => { eprintln!("Profundidad inválida"); continue; }
                };
                match repo.select_reversed_synthesis_routes(target, max_depth) {
                    Ok(rows) => match serde_json::to_string_pretty(&rows) {
                        Ok(json) => println!("{}", json),
                        Err(e) => eprintln!("Error serializando rutas: {}", e),
                    },
                    Err(e) => eprintln!("Error consultando rutas: {}", e),
                }
            }
            "6" => {
                let confirm = prompt("Confirma borrado de todas las tablas? escribir 'yes' para confirmar: ")?;
                if confirm.trim().to_lowercase() == "yes" {
                    match repo.drop_all_tables() {
                        Ok(()) => println!("Tablas eliminadas"),
                        Err(e) => eprintln!("Error eliminando tablas: {}", e),
                    }
                } else {
                    println!("Borrado cancelado");
                }
            }
            "7" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn read_records(text: &str) -> Vec<String> {
    text.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')).map(str::to_string).collect()
}

fn trim_record(smiles: &str) -> Option<String> {
    let s = smiles.split_whitespace().next()?;
    Some(s.to_string())
}

/// `reactivos>espectadores>productos`; los participantes van separados por `.`.
fn split_reaction(smiles: &str) -> Option<Vec<StandardizedReaction>> {
    let canonical = smiles.split_whitespace().next()?;
    let parts: Vec<&str> = canonical.split('>').collect();
    if parts.len() != 3 {
        return None;
    }
    let side = |s: &str| -> Vec<String> { s.split('.').filter(|p| !p.is_empty()).map(str::to_string).collect() };
    let (reactants, products) = (side(parts[0]), side(parts[2]));
    if reactants.is_empty() || products.is_empty() {
        return None;
    }
    Some(vec![StandardizedReaction::new(canonical, reactants, side(parts[1]), products)])
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}

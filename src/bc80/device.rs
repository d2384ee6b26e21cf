//! High-level BC80 driver: operating-mode transitions, cable policy and
//! interrupt service. Owns its register map so it can live in a Mutex.

use core::result::Result as CoreResult;

use super::decode;
use super::recipe::{self, FaultStage, FieldWrite};
use super::regs::*;
use super::types::*;
use crate::config;
use crate::fmt::Dbg;
use crate::regmap::RegisterMap;

pub type Result<T, E> = CoreResult<T, Error<E>>;

/// BC80 power-path controller.
pub struct Bc80<R> {
    regmap: R,
    op_mode: OpMode,
    reverse_power: bool,
    cable_type: CableType,
    infet_enabled: bool,
    irq_masked: bool,
}

impl<R> Bc80<R>
where
    R: RegisterMap,
{
    pub fn new(regmap: R) -> Self {
        Self {
            regmap,
            op_mode: OpMode::Unknown(0xFF),
            reverse_power: false,
            cable_type: CableType::None,
            infet_enabled: false,
            irq_masked: false,
        }
    }

    /// Consume the driver and return the register map.
    pub fn release(self) -> R {
        self.regmap
    }

    pub fn op_mode(&self) -> OpMode {
        self.op_mode
    }

    pub fn cable_type(&self) -> CableType {
        self.cable_type
    }

    pub fn reverse_power(&self) -> bool {
        self.reverse_power
    }

    pub fn infet_enabled(&self) -> bool {
        self.infet_enabled
    }

    pub fn irq_masked(&self) -> bool {
        self.irq_masked
    }

    // ------------------ Core / Identity ------------------

    pub async fn device_id(&mut self) -> Result<u8, R::Error> {
        self.regmap.read(REG_DEVICE_ID).await.map_err(Error::Bus)
    }

    /// Validate the part, mirror the hardware state and start the ADC.
    pub async fn probe(&mut self) -> Result<(), R::Error> {
        match self.device_id().await? {
            BC80_DEVICE_ID => {}
            other => return Err(Error::InvalidDevice(other)),
        }
        let mode = self.read_mode().await?;
        let fet = self.regmap.read(REG_FET_CTRL).await.map_err(Error::Bus)?;
        self.infet_enabled = (fet & INFET_EN) != 0;
        self.regmap
            .update_bits(REG_ADC_CTRL, ADC_EN | ADC_RATE, ADC_EN)
            .await
            .map_err(Error::Bus)?;
        info!("BC80: online, mode={:?} infet={}", mode, self.infet_enabled);
        Ok(())
    }

    /// Read MODE_SEL from hardware and refresh the mirror.
    pub async fn read_mode(&mut self) -> Result<OpMode, R::Error> {
        let ctrl = self.regmap.read(REG_CTRL_0).await.map_err(Error::Bus)?;
        self.op_mode = OpMode::from_code((ctrl & MODE_SEL_MASK) >> MODE_SEL_SHIFT);
        Ok(self.op_mode)
    }

    // ------------------ Helpers ------------------

    /// Best-effort masked write; failures are logged and swallowed.
    async fn apply(&mut self, step: FieldWrite, what: &str) {
        if let Err(e) = self.regmap.update_bits(step.reg, step.mask, step.val).await {
            warn!(
                "BC80: {} write reg=0x{:02X} mask=0x{:02X} val=0x{:02X} failed: {:?}",
                what, step.reg, step.mask, step.val, Dbg(&e)
            );
        }
    }

    async fn apply_fault_profile(&mut self, target: OpMode, stage: FaultStage) {
        if let Some(step) = recipe::fault_profile(target, self.reverse_power, stage) {
            self.apply(step, "fault profile").await;
        }
    }

    // ------------------ Power path ------------------

    /// Drive the power path into `target`.
    ///
    /// Only an unknown target is an error. Register failures along the way
    /// are logged and the sequence carries on.
    pub async fn change_mode(&mut self, target: OpMode) -> Result<(), R::Error> {
        let select = match recipe::mode_select(target) {
            Some(step) => step,
            None => {
                warn!("BC80: rejecting mode code {}", target.code());
                return Err(Error::InvalidMode(target.code()));
            }
        };

        let prev = match self.read_mode().await {
            Ok(m) => m,
            Err(e) => {
                warn!("BC80: mode readback failed: {:?}", Dbg(&e));
                OpMode::Unknown(0xFF)
            }
        };
        info!(
            "BC80: change_mode {:?} -> {:?} (reverse={})",
            prev, target, self.reverse_power
        );

        if let Some(step) = recipe::precharge_step(target) {
            self.apply(step, "precharge").await;
        }

        match target {
            OpMode::Standby => {
                self.apply_fault_profile(target, FaultStage::Final).await;
                self.apply(select, "mode select").await;
            }
            _ => {
                self.apply_fault_profile(target, FaultStage::Temporary).await;
                self.apply(select, "mode select").await;
                self.apply_fault_profile(target, FaultStage::Final).await;
            }
        }

        self.op_mode = target;
        Ok(())
    }

    /// Gate the input FET. Best effort.
    pub async fn set_infet(&mut self, enable: bool) {
        let val = if enable { INFET_EN } else { 0 };
        debug!("BC80: set_infet({})", enable);
        self.apply(FieldWrite::new(REG_FET_CTRL, INFET_EN, val), "infet").await;
        self.infet_enabled = enable;
    }

    /// Record the power-flow direction used by the next transition.
    pub fn set_reverse_power(&mut self, enable: bool) {
        if self.reverse_power != enable {
            info!("BC80: reverse_power {} -> {}", self.reverse_power, enable);
        }
        self.reverse_power = enable;
    }

    /// Policy hook for a change of the upstream cable classification.
    pub async fn on_cable_changed(&mut self, cable: CableType) {
        let prev = self.cable_type;
        let leaving_no_charge = !prev.is_charging() && cable.is_charging();
        let entering_no_charge = prev.is_charging() && !cable.is_charging();
        info!("BC80: cable {:?} -> {:?}", prev, cable);

        if leaving_no_charge {
            if let Err(e) = self.mask_irq().await {
                warn!("BC80: mask on cable attach failed: {:?}", Dbg(&e));
            }
        }

        self.cable_type = cable;

        match cable {
            CableType::Wired => {
                self.set_infet(false).await;
                // Known target, cannot be rejected.
                let _ = self.change_mode(OpMode::Bypass).await;
            }
            CableType::Wireless => {
                self.set_infet(true).await;
            }
            CableType::PdApdo => {
                // TODO: PD-APDO power-path policy is undefined upstream; left as a no-op.
                debug!("BC80: PD-APDO cable, no power-path action");
            }
            CableType::None => {
                if entering_no_charge {
                    if let Err(e) = self.unmask_irq().await {
                        warn!("BC80: unmask on cable detach failed: {:?}", Dbg(&e));
                    }
                }
            }
        }

        if leaving_no_charge {
            if let Err(e) = self.dump_registers().await {
                warn!("BC80: register dump failed: {:?}", Dbg(&e));
            }
        }
    }

    // ------------------ Interrupts ------------------

    async fn write_masks(&mut self, val: u8) -> Result<(), R::Error> {
        // Attempt both registers even if the first write fails.
        let r1 = self.regmap.write(REG_INT_MASK_1, val).await;
        let r2 = self.regmap.write(REG_INT_MASK_2, val).await;
        r1.and(r2).map_err(Error::Bus)
    }

    pub async fn mask_irq(&mut self) -> Result<(), R::Error> {
        self.write_masks(INT_MASK_ALL).await?;
        self.irq_masked = true;
        Ok(())
    }

    pub async fn unmask_irq(&mut self) -> Result<(), R::Error> {
        self.write_masks(INT_UNMASK_ALL).await?;
        self.irq_masked = false;
        Ok(())
    }

    /// Read the clear-on-read flags and the live status.
    pub async fn read_irq_status(&mut self) -> Result<IrqStatus, R::Error> {
        let flag1 = self.regmap.read(REG_INT_FLAG_1).await.map_err(Error::Bus)?;
        let flag2 = self.regmap.read(REG_INT_FLAG_2).await.map_err(Error::Bus)?;
        let status = self.regmap.read(REG_STATUS).await.map_err(Error::Bus)?;
        Ok(IrqStatus { flag1, flag2, status })
    }

    /// Service one device interrupt.
    ///
    /// Sources are masked for the duration and always unmasked on the way
    /// out, including when the flag read fails.
    pub async fn handle_irq(&mut self) -> Result<IrqStatus, R::Error> {
        if let Err(e) = self.mask_irq().await {
            warn!("BC80: irq mask failed: {:?}", Dbg(&e));
        }

        let res = self.read_irq_status().await;
        match &res {
            Ok(st) => {
                decode::log_flag1(st.flag1);
                decode::log_flag2(st.flag2);
                decode::log_status(st.status);
                if (st.flag2 & MODE_CHG_FLAG) != 0 {
                    if let Ok(m) = self.read_mode().await {
                        info!("BC80: hardware mode now {:?}", m);
                    }
                }
            }
            Err(e) => warn!("BC80: irq status read failed: {:?}", Dbg(e)),
        }

        if let Err(e) = self.unmask_irq().await {
            error!("BC80: irq unmask failed: {:?}", Dbg(&e));
        }
        res
    }

    // ------------------ Diagnostics ------------------

    /// Bulk-read every register except the interrupt flags and log it.
    ///
    /// The flags are clear-on-read; reading them here would hide pending
    /// events from `handle_irq`.
    pub async fn dump_registers(&mut self) -> Result<RegisterDump, R::Error> {
        let mut dump = RegisterDump { regs: [0u8; DUMP_LEN] };
        let head = (REG_INT_FLAG_1 - DUMP_FIRST) as usize;
        let tail = (REG_INT_FLAG_2 - DUMP_FIRST) as usize + 1;
        self.regmap
            .bulk_read(DUMP_FIRST, &mut dump.regs[..head])
            .await
            .map_err(Error::Bus)?;
        self.regmap
            .bulk_read(REG_INT_FLAG_2 + 1, &mut dump.regs[tail..])
            .await
            .map_err(Error::Bus)?;
        info!("BC80 register dump (0x{:02X}-0x{:02X} not read):", REG_INT_FLAG_1, REG_INT_FLAG_2);
        for (row, chunk) in dump.regs.chunks(8).enumerate() {
            info!(
                "  [0x{:02X}] {:02X} {:02X} {:02X} {:02X} {:02X} {:02X} {:02X} {:02X}",
                DUMP_FIRST as usize + row * 8,
                chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7]
            );
        }
        Ok(dump)
    }

    /// Decode the configuration currently programmed in hardware.
    pub async fn read_config(&mut self) -> Result<Bc80Config, R::Error> {
        let mut block = [0u8; 5];
        self.regmap
            .bulk_read(REG_CTRL_0, &mut block)
            .await
            .map_err(Error::Bus)?;
        let cfg = Bc80Config::from_block(&block);
        self.op_mode = cfg.mode;
        Ok(cfg)
    }

    pub async fn read_adc(&mut self) -> Result<AdcReadings, R::Error> {
        let mut block = [0u8; ADC_BLOCK_LEN];
        self.regmap
            .bulk_read(REG_VIN_ADC, &mut block)
            .await
            .map_err(Error::Bus)?;
        Ok(AdcReadings::from_block(&block, config::BC80_R_INPUT_SENSE_MOHM))
    }

    // ------------------ Power management ------------------

    pub async fn suspend(&mut self) -> Result<(), R::Error> {
        debug!("BC80: suspend");
        self.mask_irq().await
    }

    pub async fn resume(&mut self) -> Result<(), R::Error> {
        debug!("BC80: resume");
        self.unmask_irq().await?;
        self.read_mode().await.map(|_| ())
    }
}
